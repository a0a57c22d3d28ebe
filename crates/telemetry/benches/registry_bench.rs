use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use telemetry::{Registry, Sample};

fn bench_record_sample(c: &mut Criterion) {
    let registry = Registry::new().unwrap();
    let sample = Sample::new("index", "GET", 200, Duration::from_micros(350));

    c.bench_function("registry/record_sample", |b| {
        b.iter(|| registry.record(&sample));
    });
}

fn bench_render(c: &mut Criterion) {
    let registry = Registry::new().unwrap();
    for endpoint in ["index", "healthz", "metrics", "unknown"] {
        for status in [200, 404, 500] {
            registry.record(&Sample::new(endpoint, "GET", status, Duration::from_millis(3)));
        }
    }

    c.bench_function("registry/render", |b| {
        b.iter(|| registry.render());
    });
}

criterion_group!(benches, bench_record_sample, bench_render);
criterion_main!(benches);
