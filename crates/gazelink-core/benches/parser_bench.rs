//! Criterion benchmarks for serial line classification.
//!
//! A microcontroller can stream coordinates faster than the 100 ms poll
//! interval drains them, so parsing must stay well below a millisecond even
//! for lines that fall through every command.
//!
//! Run with:
//! ```bash
//! cargo bench --package gazelink-core --bench parser_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gazelink_core::{
    CommandActions, CommandParser, PointerError, PointerTarget, ScreenSize, SpeedTier,
};

/// Validates moves but performs no I/O.
struct NullActions;

impl CommandActions for NullActions {
    fn move_pointer(
        &self,
        x_input: &str,
        y_input: &str,
        _tier: SpeedTier,
    ) -> Result<PointerTarget, PointerError> {
        Ok(PointerTarget::parse(x_input, y_input, ScreenSize::new(1920, 1080))?)
    }

    fn show_calibration(&self) {}

    fn hide_calibration(&self) {}
}

fn bench_parse(c: &mut Criterion) {
    let parser = CommandParser::new();
    let lines: &[(&str, &str)] = &[
        ("coordinate", "[100,200]"),
        ("coordinate_spaced", "(1234, 567)"),
        ("calibration_required", "calibration_required"),
        ("calibration_done", "calibration_done"),
        ("unknown", "invalid_data"),
        ("wrong_count", "123,456,789"),
    ];

    let mut group = c.benchmark_group("parse");
    for (name, line) in lines {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| {
                let _ = parser.parse(black_box(line), &NullActions);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
