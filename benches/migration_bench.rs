#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynecs::{ComponentKey, Value, World};

fn migration_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("migration_bench");

    let position = ComponentKey::new("position");
    let velocity = ComponentKey::new("velocity");
    let health = ComponentKey::new("health");

    group.bench_function("add_then_remove_warm_edges", |b| {
        let mut world = World::new();
        let entities: Vec<_> = (0..1000)
            .map(|_| world.spawn(vec![(position.clone(), Value::Float(0.0))]))
            .collect();
        // Walk the add/remove edges once so the benchmark measures the
        // warm-cache path, not archetype creation.
        for &e in &entities {
            world.add(e, velocity.clone(), Value::Float(0.0));
            world.remove(e, velocity.clone());
        }

        b.iter(|| {
            for &e in &entities {
                world.add(e, velocity.clone(), Value::Float(1.0));
                black_box(world.has(e, "velocity"));
                world.remove(e, velocity.clone());
            }
        });
    });

    group.bench_function("cold_archetype_creation", |b| {
        b.iter(|| {
            let mut world = World::new();
            let e = world.spawn(vec![(position.clone(), Value::Float(0.0))]);
            world.add(e, velocity.clone(), Value::Float(0.0));
            world.add(e, health.clone(), Value::Int(100));
            black_box(world.has(e, "health"));
        });
    });

    group.finish();
}

criterion_group!(benches, migration_benchmark);
criterion_main!(benches);
