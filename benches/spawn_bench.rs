#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynecs::{ComponentKey, Value, World};

fn spawn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_bench");

    let position = ComponentKey::new("position");
    let velocity = ComponentKey::new("velocity");
    let health = ComponentKey::new("health");

    group.bench_function("spawn_2_components", |b| {
        let mut world = World::new();
        b.iter(|| {
            for _ in 0..1000 {
                black_box(world.spawn(vec![
                    (position.clone(), Value::Float(1.0)),
                    (velocity.clone(), Value::Float(0.0)),
                ]));
            }
        });
    });

    group.bench_function("spawn_3_components", |b| {
        let mut world = World::new();
        b.iter(|| {
            for _ in 0..1000 {
                black_box(world.spawn(vec![
                    (position.clone(), Value::Float(1.0)),
                    (velocity.clone(), Value::Float(0.0)),
                    (health.clone(), Value::Int(100)),
                ]));
            }
        });
    });

    group.bench_function("spawn_mixed", |b| {
        let mut world = World::new();
        b.iter(|| {
            for i in 0..1000 {
                if i % 2 == 0 {
                    black_box(world.spawn(vec![
                        (position.clone(), Value::Float(1.0)),
                        (velocity.clone(), Value::Float(0.0)),
                    ]));
                } else {
                    black_box(world.spawn(vec![
                        (position.clone(), Value::Float(1.0)),
                        (velocity.clone(), Value::Float(0.0)),
                        (health.clone(), Value::Int(100)),
                    ]));
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, spawn_benchmark);
criterion_main!(benches);
