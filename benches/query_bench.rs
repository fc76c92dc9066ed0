#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynecs::{ComponentKey, Value, World};

fn build_world(entity_count: usize) -> World {
    let mut world = World::new();
    let position = ComponentKey::new("position");
    let velocity = ComponentKey::new("velocity");
    let dead = ComponentKey::new("dead");
    for i in 0..entity_count {
        if i % 5 == 0 {
            world.spawn(vec![
                (position.clone(), Value::Float(0.0)),
                (velocity.clone(), Value::Float(0.0)),
                (dead.clone(), Value::Bool(true)),
            ]);
        } else {
            world.spawn(vec![
                (position.clone(), Value::Float(0.0)),
                (velocity.clone(), Value::Float(0.0)),
            ]);
        }
    }
    world
}

fn query_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_bench");

    group.bench_function("cached_count_with_exclusion", |b| {
        let world = build_world(5000);
        let query = world.query().with("position").with("velocity").without("dead");
        // Warm the query cache before measuring.
        black_box(query.count(&world));
        b.iter(|| black_box(query.count(&world)));
    });

    group.bench_function("each_over_5000_entities", |b| {
        let mut world = build_world(5000);
        let query = world.query().with("position").with("velocity");
        b.iter(|| {
            let mut sum = 0.0;
            query.each(&mut world, |_world, _entity, values| {
                sum += values[0].as_float().unwrap_or(0.0);
            });
            black_box(sum);
        });
    });

    group.finish();
}

criterion_group!(benches, query_benchmark);
criterion_main!(benches);
