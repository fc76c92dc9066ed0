//! Querying with exclusions and reacting to component removal.

use dynecs::{ComponentKey, Value, World};

fn main() {
    let mut world = World::new();

    world.on_remove("health", |_world, entity, value| {
        println!("entity {entity:?} lost health {value:?}");
    });

    let health = ComponentKey::new("health");
    let dead = ComponentKey::new("dead");

    for i in 0..5 {
        let e = world.spawn(vec![(health.clone(), Value::Int(100 - i * 20))]);
        if i == 4 {
            world.add(e, dead.clone(), Value::Bool(true));
        }
    }

    let alive = world.query().with("health").without("dead");
    println!("alive entities: {}", alive.count(&world));

    alive.each(&mut world, |world, entity, values| {
        let hp = values[0].as_int().unwrap_or(0);
        if hp <= 20 {
            world.remove(entity, "health");
        }
    });

    println!("alive entities after cull: {}", alive.count(&world));
}
