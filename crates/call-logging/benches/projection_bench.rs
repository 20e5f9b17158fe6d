use call_logging::prelude::*;
use call_logging::{LogRecord, PathTree, exclude, project};
use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;
use std::sync::Arc;

struct NullSink;

impl LogSink for NullSink {
    fn write(&self, record: &LogRecord) {
        black_box(record);
    }
}

fn sample_payload() -> Value {
    json!({
        "user": {
            "id": 42,
            "name": "Alice",
            "email": "alice@example.com",
            "password": "hunter2",
            "roles": ["admin", "dev", "ops"],
            "address": { "street": "1 Main St", "city": "Oslo", "zip": "0150" }
        },
        "items": (0..20).map(|i| json!({ "id": i, "sku": format!("SKU-{i}"), "secret": "x" })).collect::<Vec<_>>(),
        "meta": { "trace": "abc", "source": "web" }
    })
}

fn bench_tree_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_building");

    group.bench_function("ten_paths", |b| {
        let paths = [
            "user.id",
            "user.name",
            "user.address.city",
            "user.roles.0",
            "items.0.id",
            "items.1.id",
            "items.2.id",
            "meta.source",
            "meta.trace",
            "user.address.zip",
        ];
        b.iter(|| PathTree::from_paths(black_box(paths)));
    });

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    let payload = sample_payload();

    // Benchmark include projection
    let include = PathTree::from_paths(["user.id", "user.address.city", "items.3.sku", "meta"]);
    group.bench_function("include", |b| {
        b.iter(|| project(black_box(&payload), black_box(&include)));
    });

    // Benchmark exclude projection
    let secrets: Vec<String> = (0..20).map(|i| format!("items.{i}.secret")).collect();
    let mut excluded = secrets;
    excluded.push("user.password".to_string());
    let exclude_tree = PathTree::from_paths(&excluded);
    group.bench_function("exclude", |b| {
        b.iter(|| exclude(black_box(&payload), black_box(&exclude_tree)));
    });

    // Benchmark exclude that matches nothing
    let miss = PathTree::from_paths(["nope.nothing"]);
    group.bench_function("exclude_miss", |b| {
        b.iter(|| exclude(black_box(&payload), black_box(&miss)));
    });

    group.finish();
}

fn bench_wrapped_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrapped_call");
    let payload = sample_payload();
    let sink: Arc<dyn LogSink> = Arc::new(NullSink);

    let owner = LoggedClass::injectable("UserService")
        .with_config(&LoggedConfig::new().with_announcement(false))
        .with_sink(Arc::clone(&sink));
    let plain = owner.method("plain", LoggedMetadata::new());
    let filtered = owner.method(
        "filtered",
        LoggedMetadata::new()
            .param(LoggedParam::new(0, "body").exclude(["user.password"]))
            .inject_logger()
            .returns(ReturnFormat::fields([("id", "user.id")])),
    );

    group.bench_function("no_params", |b| {
        b.iter(|| plain.call(ScopeSource::Root, (), |_, ()| Ok::<_, String>(black_box(1))));
    });

    group.bench_function("filtered_param_scoped", |b| {
        let request = RequestScope::from_header(Some("bench"));
        b.iter(|| {
            filtered.call(&request, (payload.clone(),), |_, (body,): (Value,)| Ok::<_, String>(body))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_tree_building, bench_projection, bench_wrapped_call);
criterion_main!(benches);
