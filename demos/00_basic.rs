//! Spawning entities, reading and overwriting components, and
//! destroying an entity.

use dynecs::{ComponentKey, Value, World};

fn main() {
    let mut world = World::new();

    let health = ComponentKey::new("health");
    let position = ComponentKey::new("position");

    let hero = world.spawn(vec![
        (health.clone(), Value::Int(100)),
        (position.clone(), Value::table()),
    ]);

    println!("hero has health: {}", world.has(hero, health.clone()));
    println!("hero health: {:?}", world.get(hero, health.clone()));

    world.entity(hero).add("level", Value::Int(1)).add("name", Value::Str("Aria".into()));

    println!("{:?}", world.archetype_report());
    println!("{:?}", world.stats());

    world.destroy(hero);
    println!("hero still valid: {}", world.valid(hero));
}
