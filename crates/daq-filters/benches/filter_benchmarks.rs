//! Filter Benchmarks
//!
//! Criterion benchmarks for the per-update hot path: validation followed by
//! classification.

use criterion::{Criterion, criterion_group, criterion_main};
use daq_core::prelude::*;
use daq_filters::prelude::*;

fn current(value: f64) -> CurrentValue {
    CurrentValue {
        value: Some(TagValue::Double(value)),
        value_description: String::new(),
        quality: SourceQuality::ok(),
        source_timestamp: 1_000,
        daq_timestamp: 1_000,
    }
}

fn bench_classify_repeat(c: &mut Criterion) {
    let tag = TagConfig::new(1, "BENCH.REPEAT", DataType::Double);
    let cur = current(42.0);
    let update = ValueUpdate::new(42.0, 2_000);
    let quality = SourceQuality::ok();

    c.bench_function("classify_repeated_value", |b| {
        b.iter(|| {
            classify(
                std::hint::black_box(&tag),
                std::hint::black_box(Some(&cur)),
                std::hint::black_box(&update),
                std::hint::black_box(&quality),
            )
        })
    });
}

fn bench_classify_deadband(c: &mut Criterion) {
    let tag = TagConfig::new(1, "BENCH.DEADBAND", DataType::Double)
        .with_value_deadband(ValueDeadbandType::Relative, 5.0);
    let cur = current(100.0);
    let update = ValueUpdate::new(101.0, 2_000);
    let quality = SourceQuality::ok();

    c.bench_function("classify_value_deadband", |b| {
        b.iter(|| {
            classify(
                std::hint::black_box(&tag),
                std::hint::black_box(Some(&cur)),
                std::hint::black_box(&update),
                std::hint::black_box(&quality),
            )
        })
    });
}

fn bench_validate(c: &mut Criterion) {
    let validator = UpdateValidator::default();
    let tag = TagConfig::new(1, "BENCH.RANGE", DataType::Integer).with_range(Some(0.0), Some(1000.0));
    let update = ValueUpdate::new(TagValue::String("512".into()), 2_000);

    c.bench_function("validate_string_to_integer", |b| {
        b.iter(|| {
            validator.validate(
                std::hint::black_box(&tag),
                std::hint::black_box(&update),
                std::hint::black_box(2_000),
            )
        })
    });
}

criterion_group!(benches, bench_classify_repeat, bench_classify_deadband, bench_validate);
criterion_main!(benches);
