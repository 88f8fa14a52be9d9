//! The "current device" slot and the error for failed opens.
//!
//! Each ingestion channel owns one [`DeviceSlot`].  A background loop captures
//! the `Arc` it was started with and keeps running only while
//! [`DeviceSlot::is_current`] says that exact `Arc` is still installed.
//! Disconnecting (taking the handle out) or reconnecting (replacing it) is
//! therefore enough to stop the loop; no extra signal is needed.
//!
//! Identity, not equality: two handles to the same port name are still
//! different devices, and a loop holding the old one must stop.
//!
//! A loop may finish the iteration it is in before noticing the change, so
//! shutdown latency is one poll interval.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// A device could not be opened (or its reader could not be started).
///
/// The channel stays idle; nothing retries.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The OS refused to open the device.
    #[error("{device}: {reason}")]
    Open { device: String, reason: String },

    /// The reader thread could not be spawned.
    #[error("could not start reader for {device}: {source}")]
    Spawn {
        device: String,
        #[source]
        source: std::io::Error,
    },
}

/// Holds at most one current device handle.
///
/// Every operation takes the same lock, so `replace`, `take` and `is_current`
/// never observe a half-updated slot.
pub struct DeviceSlot<T: ?Sized> {
    current: Mutex<Option<Arc<T>>>,
}

impl<T: ?Sized> DeviceSlot<T> {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Installs `handle`, returning the previously current handle (if any).
    pub fn replace(&self, handle: Arc<T>) -> Option<Arc<T>> {
        self.current.lock().replace(handle)
    }

    /// Removes and returns the current handle.
    pub fn take(&self) -> Option<Arc<T>> {
        self.current.lock().take()
    }

    /// Returns a clone of the current handle.
    pub fn current(&self) -> Option<Arc<T>> {
        self.current.lock().clone()
    }

    /// `true` if `handle` is the very same allocation as the current handle.
    pub fn is_current(&self, handle: &Arc<T>) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, handle))
    }

    pub fn is_empty(&self) -> bool {
        self.current.lock().is_none()
    }
}

impl<T: ?Sized> Default for DeviceSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_empty() {
        let slot: DeviceSlot<String> = DeviceSlot::new();
        assert!(slot.is_empty());
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_is_current_compares_identity_not_value() {
        // Arrange – two handles with equal contents
        let slot = DeviceSlot::new();
        let first = Arc::new("COM8".to_string());
        let second = Arc::new("COM8".to_string());
        slot.replace(Arc::clone(&first));

        // Assert
        assert!(slot.is_current(&first));
        assert!(!slot.is_current(&second));
    }

    #[test]
    fn test_replace_returns_previous_handle() {
        let slot = DeviceSlot::new();
        let first = Arc::new(1u32);
        let second = Arc::new(2u32);

        assert!(slot.replace(Arc::clone(&first)).is_none());
        let previous = slot.replace(Arc::clone(&second)).expect("previous");

        assert!(Arc::ptr_eq(&previous, &first));
        assert!(slot.is_current(&second));
        assert!(!slot.is_current(&first));
    }

    #[test]
    fn test_take_is_idempotent() {
        // Arrange
        let slot = DeviceSlot::new();
        slot.replace(Arc::new(7u32));

        // Act
        let first = slot.take();
        let second = slot.take();

        // Assert
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(slot.is_empty());
    }

    #[test]
    fn test_slot_holds_trait_objects() {
        let slot: DeviceSlot<dyn Fn() -> u32 + Send + Sync> = DeviceSlot::new();
        let handle: Arc<dyn Fn() -> u32 + Send + Sync> = Arc::new(|| 5);
        slot.replace(Arc::clone(&handle));
        assert!(slot.is_current(&handle));
    }
}
