//! Marker ordering and the base-100 id↔coordinate code.

use tracing::{debug, warn};

use super::MarkerObservation;

/// Number of markers that together encode one coordinate.
pub const MARKERS_PER_COORDINATE: usize = 4;

/// Largest coordinate the code can express on either axis.
pub const MAX_ENCODED_COORDINATE: u32 = 9999;

/// Returns marker identifiers in left-to-right reading order.
///
/// Observations are sorted by `x_position` ascending; equal positions fall
/// back to the identifier so the order is total and repeatable.
pub fn order_ids(observations: &[MarkerObservation]) -> Vec<u32> {
    let mut sorted = observations.to_vec();
    sorted.sort_by(|a, b| {
        a.x_position
            .total_cmp(&b.x_position)
            .then_with(|| a.id.cmp(&b.id))
    });
    debug!(?sorted, "marker positions with ids");
    sorted.into_iter().map(|o| o.id).collect()
}

/// Folds four ordered identifiers into `(x, y)`.
///
/// `x = 100*ids[0] + ids[1]`, `y = 100*ids[2] + ids[3]`.
///
/// Returns `None` (and logs a warning) for any other number of identifiers;
/// a partial set is never guessed.  Identifiers whose fold does not fit in a
/// `u32` also yield `None`.
pub fn ids_to_coordinates(ids: &[u32]) -> Option<(u32, u32)> {
    let [x_hi, x_lo, y_hi, y_lo] = ids else {
        warn!(
            "{ids:?} does not contain exactly {MARKERS_PER_COORDINATE} elements and coordinates cannot be deduced."
        );
        return None;
    };
    let folded = fold(*x_hi, *x_lo).zip(fold(*y_hi, *y_lo));
    if folded.is_none() {
        warn!("{ids:?} overflow the coordinate range");
    }
    folded
}

fn fold(hi: u32, lo: u32) -> Option<u32> {
    hi.checked_mul(100)?.checked_add(lo)
}

/// The inverse of [`ids_to_coordinates`], for the marker-producing side.
///
/// Returns `None` if either coordinate exceeds [`MAX_ENCODED_COORDINATE`].
pub fn coordinates_to_ids(x: u32, y: u32) -> Option<[u32; MARKERS_PER_COORDINATE]> {
    if x > MAX_ENCODED_COORDINATE || y > MAX_ENCODED_COORDINATE {
        return None;
    }
    Some([x / 100, x % 100, y / 100, y % 100])
}

// ── Tests ─────────────────────────────────────────────────────────────────────
