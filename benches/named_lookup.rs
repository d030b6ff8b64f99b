use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_autowire::*;
use std::sync::Arc;

trait Handler: Send + Sync {
    fn id(&self) -> usize;
}

macro_rules! handlers {
    ($($name:ident = $id:expr, $marker:ident;)*) => {
        $(
            struct $name;
            impl Handler for $name {
                fn id(&self) -> usize {
                    $id
                }
            }
            component!($name: $marker);
        )*

        fn all_candidates() -> Vec<Candidate> {
            vec![$(
                Candidate::new(|_| $name).implements::<dyn Handler>(|c| c as Arc<dyn Handler>).build(),
            )*]
        }
    };
}

handlers! {
    Create = 0, singleton;
    Read = 1, singleton;
    Update = 2, singleton;
    Delete = 3, singleton;
    List = 4, scoped;
    Search = 5, scoped;
    Export = 6, transient;
    Import = 7, transient;
}

fn provider() -> ServiceProvider {
    ServiceCollection::new()
        .add_module(Registrar::with_candidates(all_candidates()))
        .expect("scan")
        .build()
}

// ===== Scanning =====

fn bench_scan(c: &mut Criterion) {
    let registrar = Registrar::with_candidates(all_candidates());

    c.bench_function("scan_into_collection", |b| {
        b.iter(|| {
            let mut services = ServiceCollection::new();
            let report = registrar.scan(&mut services).unwrap();
            black_box(report.registered().len());
        })
    });

    c.bench_function("plan_only", |b| {
        b.iter(|| black_box(registrar.plan().unwrap().len()))
    });
}

// ===== Named lookup =====

fn bench_get_value(c: &mut Criterion) {
    let sp = provider();
    let scope = sp.create_scope();
    let factory = scope.factory::<dyn Handler>();

    let mut group = c.benchmark_group("get_value");
    for name in ["Create", "List", "Export", "Import"] {
        // Prime cached lifetimes
        let _ = factory.get_value(name).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |b, name| {
            b.iter(|| black_box(factory.get_value(name).unwrap().id()))
        });
    }
    group.finish();

    c.bench_function("get_value_miss", |b| {
        b.iter(|| black_box(factory.get_value("Missing").is_err()))
    });
}

fn bench_item_names(c: &mut Criterion) {
    let sp = provider();
    let factory = sp.factory::<dyn Handler>();

    c.bench_function("item_names", |b| b.iter(|| black_box(factory.item_names().len())));
}

fn bench_typed_vs_named(c: &mut Criterion) {
    let sp = provider();
    let mut group = c.benchmark_group("typed_vs_named_singleton");

    let _ = sp.get::<Create>().unwrap();
    group.bench_function("typed", |b| b.iter(|| black_box(sp.get::<Create>().unwrap())));

    let factory = sp.factory::<dyn Handler>();
    group.bench_function("named", |b| b.iter(|| black_box(factory.get_value("Create").unwrap().id())));

    group.finish();
}

criterion_group!(benches, bench_scan, bench_get_value, bench_item_names, bench_typed_vs_named);
criterion_main!(benches);
