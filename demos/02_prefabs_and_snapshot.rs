//! Registering a prefab, spawning instances with overrides, and
//! dumping/restoring world state.

use dynecs::{ComponentKey, Value, World};

fn main() {
    let mut world = World::new();

    world
        .prefab(
            "goblin",
            vec![
                (ComponentKey::new("health"), Value::Int(30)),
                (ComponentKey::new("name"), Value::Str("Goblin".into())),
            ],
        )
        .expect("prefab registered once");

    let a = world
        .spawn_prefab("goblin", std::iter::empty())
        .expect("goblin prefab exists");
    let b = world
        .spawn_prefab("goblin", vec![(ComponentKey::new("name"), Value::Str("Grunk".into()))])
        .expect("goblin prefab exists");

    println!("a: {:?}", world.get(a, "name"));
    println!("b: {:?}", world.get(b, "name"));

    let snapshot = world.serialize();
    println!("snapshot has {} entities", snapshot.entity_count());
    if !snapshot.skipped_opaque.is_empty() {
        println!("dropped opaque components: {:?}", snapshot.skipped_opaque);
    }

    let mut reloaded = World::new();
    reloaded.deserialize(&snapshot);
    println!("reloaded world stats: {:?}", reloaded.stats());
}
