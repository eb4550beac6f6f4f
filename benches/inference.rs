//! Inference benchmark: trained bundle → remaining-time prediction per variant.

use chrono::{DateTime, Duration};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use remaining_time::config::TrainOptions;
use remaining_time::eventlog::{Event, EventLog, Trace, DEFAULT_ACTIVITY_KEY, DEFAULT_TIMESTAMP_KEY};
use remaining_time::predictor::{self, Variant};

fn make_trace(i: usize, len: usize) -> Trace {
    let start = DateTime::parse_from_rfc3339("2021-01-04T08:00:00+00:00").unwrap();
    let acts = ["A", "B", "C", "D", "E"];
    let events = (0..len)
        .map(|k| {
            Event::new()
                .with(DEFAULT_ACTIVITY_KEY, acts[(i + k) % acts.len()])
                .with(DEFAULT_TIMESTAMP_KEY, start + Duration::hours((k * (1 + i % 4)) as i64))
        })
        .collect();
    Trace::new(events)
}

fn training_log() -> EventLog {
    EventLog::new((0..40).map(|i| make_trace(i, 2 + i % 5)).collect())
}

fn bench_predict_single(c: &mut Criterion) {
    let opts = TrainOptions {
        default_epochs: 2,
        ..TrainOptions::default()
    };
    let log = training_log();
    let partial = make_trace(3, 3);

    let mut g = c.benchmark_group("predict_single_trace");
    for variant in [Variant::ElasticNet, Variant::SequenceModel] {
        let bundle = match predictor::train(&log, variant, &opts) {
            Ok(b) => b,
            Err(_) => continue,
        };
        g.bench_function(variant.as_str(), |b| {
            b.iter(|| black_box(predictor::test(&bundle, black_box(&partial))))
        });
    }
    g.finish();
}

fn bench_predict_log(c: &mut Criterion) {
    let opts = TrainOptions {
        default_epochs: 2,
        ..TrainOptions::default()
    };
    let log = training_log();
    let Ok(bundle) = predictor::train(&log, Variant::SequenceModel, &opts) else {
        return;
    };
    c.bench_function("sequence_predict_40_traces", |b| {
        b.iter(|| black_box(predictor::test(&bundle, black_box(&log))))
    });
}

criterion_group!(benches, bench_predict_single, bench_predict_log);
criterion_main!(benches);
