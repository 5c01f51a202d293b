//! Training benchmark: full five-label run per classifier.

use criterion::{criterion_group, criterion_main, Criterion};
use disease_risk::config::{ClassifierConfig, ClassifierKind, TrainingConfig};
use disease_risk::dataset::Dataset;
use disease_risk::features::{FEATURE_COUNT, LABEL_COUNT};
use disease_risk::model;
use disease_risk::training::Trainer;

fn synthetic(n: usize) -> Dataset {
    let rows = (0..n)
        .map(|i| {
            let mut values = [0.0; FEATURE_COUNT];
            for (j, v) in values.iter_mut().enumerate() {
                *v = ((i * (j + 5)) % 23) as f64;
            }
            values[1] = (i % 2) as f64;
            values[11] = (i % 3 == 0) as u8 as f64;
            values[12] = (i % 7 == 0) as u8 as f64;
            let mut outcomes = [0u8; LABEL_COUNT];
            for (k, o) in outcomes.iter_mut().enumerate() {
                *o = (values[k + 2] > 11.0) as u8;
            }
            (values, outcomes)
        })
        .collect();
    Dataset::from_rows(rows).unwrap()
}

fn bench_train(c: &mut Criterion) {
    let dataset = synthetic(1000);
    let mut g = c.benchmark_group("train_1000_rows");
    g.sample_size(10);
    for (name, kind) in [("mlp", ClassifierKind::Mlp), ("logistic", ClassifierKind::Logistic)] {
        let cfg = ClassifierConfig {
            kind,
            ..ClassifierConfig::default()
        };
        let trainer = Trainer::new(model::from_config(&cfg), TrainingConfig::default());
        g.bench_function(name, |b| b.iter(|| trainer.train(&dataset).unwrap()));
    }
    g.finish();
}

criterion_group!(benches, bench_train);
criterion_main!(benches);
