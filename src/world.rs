// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! World: central entity and archetype storage.
//!
//! Ties together the entity registry, archetype table, archetype
//! graph, component reverse index, query cache, reactive hooks,
//! prefab/pattern registries, and system scheduler.

use std::cell::RefCell;

use ahash::AHashMap;
use rustc_hash::FxHashMap;
#[cfg(feature = "profiling")]
use tracing::trace_span;

use crate::archetype::Archetype;
use crate::debug::{ArchetypeReport, WorldStats};
use crate::entity::{EntityId, EntityRecord, EntityRegistry};
use crate::error::Result;
use crate::handle::EntityHandle;
use crate::hooks::HookRegistry;
use crate::index::ComponentIndex;
use crate::key::{ComponentKey, Signature};
use crate::prefab::{PatternRegistry, PrefabRegistry};
use crate::query::{cache_key, Query};
use crate::scheduler::Scheduler;
use crate::snapshot::{SnapshotEntity, WorldSnapshot};
use crate::system::{CoroutineTask, SystemCallback, SystemId};
use crate::value::Value;

pub struct World {
    registry: EntityRegistry,
    archetypes: Vec<Archetype>,
    archetype_lookup: AHashMap<Signature, usize>,
    index: ComponentIndex,
    query_cache: RefCell<AHashMap<String, Vec<usize>>>,
    hooks: HookRegistry,
    prefabs: PrefabRegistry,
    patterns: PatternRegistry,
    scheduler: Scheduler,
    /// Suspends `on_add`/`on_remove` firing; set during `deserialize`.
    suppress_hooks: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        let mut world = Self {
            registry: EntityRegistry::new(),
            archetypes: Vec::new(),
            archetype_lookup: AHashMap::new(),
            index: ComponentIndex::new(),
            query_cache: RefCell::new(AHashMap::new()),
            hooks: HookRegistry::new(),
            prefabs: PrefabRegistry::new(),
            patterns: PatternRegistry::new(),
            scheduler: Scheduler::new(),
            suppress_hooks: false,
        };
        // Bootstrap the empty archetype at index 0; entities spawned
        // with no components live here, and it is the origin of the
        // archetype graph.
        world.get_or_create_archetype(Signature::empty());
        world
    }

    // ---- archetype graph --------------------------------------------------

    pub(crate) fn archetype(&self, id: usize) -> &Archetype {
        &self.archetypes[id]
    }

    fn get_or_create_archetype(&mut self, signature: Signature) -> usize {
        if let Some(&id) = self.archetype_lookup.get(&signature) {
            return id;
        }
        #[cfg(feature = "profiling")]
        let _span = trace_span!("world.create_archetype", components = signature.len()).entered();

        let id = self.archetypes.len();
        let keys = signature.keys().to_vec();
        self.archetypes.push(Archetype::new(signature.clone()));
        self.archetype_lookup.insert(signature, id);
        self.index.register_archetype(id, &keys);
        self.query_cache.borrow_mut().clear();
        id
    }

    fn resolve_add_archetype(&mut self, from: usize, key: &ComponentKey) -> usize {
        if self.archetypes[from].contains(key) {
            return from;
        }
        if let Some(target) = self.archetypes[from].add_edge(key) {
            return target;
        }
        let new_sig = self.archetypes[from].signature().with(key);
        let target = self.get_or_create_archetype(new_sig);
        self.archetypes[from].set_add_edge(key.clone(), target);
        target
    }

    fn resolve_remove_archetype(&mut self, from: usize, key: &ComponentKey) -> usize {
        if !self.archetypes[from].contains(key) {
            return from;
        }
        if let Some(target) = self.archetypes[from].remove_edge(key) {
            return target;
        }
        let new_sig = self.archetypes[from].signature().without(key);
        let target = self.get_or_create_archetype(new_sig);
        self.archetypes[from].set_remove_edge(key.clone(), target);
        target
    }

    /// Move `entity` from its current archetype to `target`, optionally
    /// writing a new value and/or dropping a key along the way.
    fn migrate(
        &mut self,
        entity: EntityId,
        target: usize,
        set: Option<(ComponentKey, Value)>,
        drop: Option<&ComponentKey>,
    ) -> EntityRecord {
        #[cfg(feature = "profiling")]
        let _span = trace_span!("world.migrate").entered();

        let old_record = self
            .registry
            .record(entity)
            .expect("migrate called on a dead entity");

        let mut values = self.archetypes[old_record.archetype_id].row_values(old_record.row);
        if let Some(key) = drop {
            values.remove(key);
        }
        if let Some((key, value)) = set {
            values.insert(key, value);
        }

        if let Some(swapped) = self.archetypes[old_record.archetype_id].remove_row(old_record.row) {
            self.registry.set_record(
                swapped,
                EntityRecord {
                    archetype_id: old_record.archetype_id,
                    row: old_record.row,
                },
            );
        }

        let new_row = self.archetypes[target].add_row(entity, values);
        let new_record = EntityRecord {
            archetype_id: target,
            row: new_row,
        };
        self.registry.set_record(entity, new_record);
        self.query_cache.borrow_mut().clear();
        new_record
    }

    // ---- query planner ------------------------------------------------

    pub(crate) fn resolve_query(&self, required: &[ComponentKey], excluded: &[ComponentKey]) -> Vec<usize> {
        let key = cache_key(required, excluded);
        if let Some(cached) = self.query_cache.borrow().get(&key) {
            return cached.clone();
        }

        #[cfg(feature = "profiling")]
        let _span = trace_span!("world.query_rebuild").entered();

        let mut sorted_required = required.to_vec();
        sorted_required.sort();
        let matches: Vec<usize> = match self.index.smallest_bucket(&sorted_required) {
            Some(anchor) => self
                .index
                .bucket(anchor)
                .iter()
                .copied()
                .filter(|&id| {
                    let arch = &self.archetypes[id];
                    required.iter().all(|k| arch.contains(k)) && excluded.iter().all(|k| !arch.contains(k))
                })
                .collect(),
            None => Vec::new(),
        };

        self.query_cache.borrow_mut().insert(key, matches.clone());
        matches
    }

    pub fn query(&self) -> Query {
        Query::new()
    }

    // ---- entity lifecycle ----------------------------------------------

    /// Create a new entity with the given initial components.
    pub fn spawn(&mut self, components: impl IntoIterator<Item = (ComponentKey, Value)>) -> EntityId {
        #[cfg(feature = "profiling")]
        let _span = trace_span!("world.spawn").entered();

        let placeholder = EntityRecord {
            archetype_id: usize::MAX,
            row: usize::MAX,
        };
        let id = self.registry.new_id(placeholder);

        let mut values: FxHashMap<ComponentKey, Value> = FxHashMap::default();
        let mut keys = Vec::new();
        for (key, value) in components {
            keys.push(key.clone());
            values.insert(key, value);
        }
        let signature = Signature::from_keys(keys);
        let archetype_id = self.get_or_create_archetype(signature);
        let row = self.archetypes[archetype_id].add_row(id, values);
        self.registry.set_record(id, EntityRecord { archetype_id, row });
        self.query_cache.borrow_mut().clear();
        id
    }

    pub fn valid(&self, id: EntityId) -> bool {
        self.registry.valid(id)
    }

    pub fn has(&self, id: EntityId, key: impl Into<ComponentKey>) -> bool {
        let key = key.into();
        self.registry
            .record(id)
            .map(|record| self.archetypes[record.archetype_id].contains(&key))
            .unwrap_or(false)
    }

    pub fn get(&self, id: EntityId, key: impl Into<ComponentKey>) -> Option<&Value> {
        let key = key.into();
        let record = self.registry.record(id)?;
        self.archetypes[record.archetype_id].get(&key, record.row)
    }

    /// Add (or, if already present, in-place overwrite) a component.
    /// No-op on an unknown entity. Overwriting an existing value does
    /// not re-fire `on_add`; only a genuine archetype transition does.
    pub fn add(&mut self, id: EntityId, key: impl Into<ComponentKey>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let Some(record) = self.registry.record(id) else {
            return;
        };

        if self.archetypes[record.archetype_id].contains(&key) {
            self.archetypes[record.archetype_id].set(&key, record.row, value);
            return;
        }

        let target = self.resolve_add_archetype(record.archetype_id, &key);
        self.migrate(id, target, Some((key.clone(), value.clone())), None);

        if !self.suppress_hooks {
            self.fire_add_hooks(key, id, value);
        }
    }

    /// Remove a component. No-op if the entity is unknown or the
    /// component is already absent.
    pub fn remove(&mut self, id: EntityId, key: impl Into<ComponentKey>) {
        let key = key.into();
        let Some(record) = self.registry.record(id) else {
            return;
        };
        if !self.archetypes[record.archetype_id].contains(&key) {
            return;
        }
        let captured = self.archetypes[record.archetype_id]
            .get(&key, record.row)
            .cloned()
            .expect("component listed as present must have a value");

        let target = self.resolve_remove_archetype(record.archetype_id, &key);
        self.migrate(id, target, None, Some(&key));

        if !self.suppress_hooks {
            self.fire_remove_hooks(key, id, captured);
        }
    }

    /// Destroy an entity: fire remove-hooks for every component while
    /// the handle is still valid, then release its row and id.
    pub fn destroy(&mut self, id: EntityId) {
        let Some(record) = self.registry.record(id) else {
            return;
        };
        let archetype = &self.archetypes[record.archetype_id];
        let captured: Vec<(ComponentKey, Value)> = archetype
            .signature()
            .keys()
            .iter()
            .map(|key| (key.clone(), archetype.get(key, record.row).cloned().unwrap()))
            .collect();

        if !self.suppress_hooks {
            for (key, value) in captured {
                self.fire_remove_hooks(key, id, value);
            }
        }

        // A hook may have mutated (or even destroyed) this entity
        // already; re-resolve before tearing it down.
        let Some(record) = self.registry.record(id) else {
            return;
        };
        if let Some(swapped) = self.archetypes[record.archetype_id].remove_row(record.row) {
            self.registry.set_record(
                swapped,
                EntityRecord {
                    archetype_id: record.archetype_id,
                    row: record.row,
                },
            );
        }
        self.registry.release(id);
        self.query_cache.borrow_mut().clear();
    }

    pub fn entity(&mut self, id: EntityId) -> EntityHandle<'_> {
        EntityHandle::new(self, id)
    }

    // ---- reactive hooks --------------------------------------------------

    pub fn on_add(
        &mut self,
        key: impl Into<ComponentKey>,
        callback: impl FnMut(&mut World, EntityId, &Value) + 'static,
    ) {
        self.hooks.register_add(key.into(), Box::new(callback));
    }

    pub fn on_remove(
        &mut self,
        key: impl Into<ComponentKey>,
        callback: impl FnMut(&mut World, EntityId, &Value) + 'static,
    ) {
        self.hooks.register_remove(key.into(), Box::new(callback));
    }

    fn fire_add_hooks(&mut self, key: ComponentKey, entity: EntityId, value: Value) {
        let mut callbacks = self.hooks.take_add(&key);
        for callback in callbacks.iter_mut() {
            callback(self, entity, &value);
        }
        self.hooks.restore_add(key, callbacks);
    }

    fn fire_remove_hooks(&mut self, key: ComponentKey, entity: EntityId, value: Value) {
        let mut callbacks = self.hooks.take_remove(&key);
        for callback in callbacks.iter_mut() {
            callback(self, entity, &value);
        }
        self.hooks.restore_remove(key, callbacks);
    }

    // ---- prefabs & patterns ----------------------------------------------

    pub fn prefab(&mut self, name: impl Into<String>, components: Vec<(ComponentKey, Value)>) -> Result<()> {
        self.prefabs.register(name, components)
    }

    /// Spawn an entity from a prefab, deep-copying template values and
    /// overrides so instances never alias each other's tables.
    pub fn spawn_prefab(
        &mut self,
        name: &str,
        overrides: impl IntoIterator<Item = (ComponentKey, Value)>,
    ) -> Result<EntityId> {
        let template = self.prefabs.template(name)?.to_vec();
        let entity = self.spawn(std::iter::empty());
        for (key, value) in template {
            self.add(entity, key, value);
        }
        for (key, value) in overrides {
            self.add(entity, key, value);
        }
        Ok(entity)
    }

    pub fn pattern(&mut self, name: impl Into<String>, keys: Vec<ComponentKey>) -> Result<()> {
        let signature = Signature::from_keys(keys);
        self.get_or_create_archetype(signature.clone());
        self.patterns.register(name, signature)
    }

    pub fn get_pattern(&self, name: &str) -> Result<Vec<EntityId>> {
        let signature = self.patterns.signature(name)?;
        Ok(self
            .archetype_lookup
            .get(signature)
            .map(|&id| self.archetypes[id].entities().to_vec())
            .unwrap_or_default())
    }

    // ---- scheduler ------------------------------------------------------

    pub fn system(&mut self, query: Query, callback: SystemCallback, priority: i32) -> SystemId {
        self.scheduler.system(query, callback, priority)
    }

    pub fn system_group(&mut self, name: impl Into<String>, parallel_hint: bool) -> Result<()> {
        self.scheduler.system_group(name, parallel_hint)
    }

    pub fn system_in_group(
        &mut self,
        group: &str,
        query: Query,
        callback: SystemCallback,
        priority: i32,
    ) -> Result<SystemId> {
        self.scheduler.system_in_group(group, query, callback, priority)
    }

    pub fn set_system_enabled(&mut self, id: SystemId, enabled: bool) {
        self.scheduler.set_enabled(id, enabled);
    }

    pub fn set_group_enabled(&mut self, group: &str, enabled: bool) -> Result<()> {
        self.scheduler.set_group_enabled(group, enabled)
    }

    pub fn attach_task(&mut self, id: SystemId, task: Box<dyn CoroutineTask>) {
        self.scheduler.attach_task(id, task);
    }

    pub fn detach_task(&mut self, id: SystemId) {
        self.scheduler.detach_task(id);
    }

    /// Run every registered system and group in priority/registration
    /// order. The scheduler is taken out of `self` for the duration of
    /// the sweep so systems can be handed `&mut World` without aliasing
    /// `self.scheduler`.
    pub fn update(&mut self, dt: f64) {
        let mut scheduler = std::mem::take(&mut self.scheduler);
        scheduler.update(self, dt);
        self.scheduler = scheduler;
    }

    pub fn update_group(&mut self, group: &str, dt: f64) -> Result<()> {
        let mut scheduler = std::mem::take(&mut self.scheduler);
        let result = scheduler.update_group(self, group, dt);
        self.scheduler = scheduler;
        result
    }

    // ---- snapshot --------------------------------------------------------

    pub fn serialize(&self) -> WorldSnapshot {
        #[cfg(feature = "profiling")]
        let _span = trace_span!("world.serialize").entered();

        let mut entities = Vec::with_capacity(self.registry.live_count());
        let mut skipped_opaque = Vec::new();
        for (id, record) in self.registry.iter() {
            let archetype = &self.archetypes[record.archetype_id];
            let mut components = std::collections::BTreeMap::new();
            for key in archetype.signature().keys() {
                let value = archetype.get(key, record.row).expect("signature key must have a value");
                match value.to_json() {
                    Some(json) => {
                        components.insert(key.as_str().to_string(), json);
                    }
                    None => skipped_opaque.push(format!("{id:?}:{key}")),
                }
            }
            entities.push(SnapshotEntity { id, components });
        }
        WorldSnapshot {
            next_id: self.registry.allocated_count(),
            free_id_count: self.registry.free_count(),
            entities,
            skipped_opaque,
        }
    }

    /// Clear entity/archetype state and restore it from `snapshot`.
    /// Reactive hooks are suspended for the duration of the restore;
    /// they would otherwise re-fire as if every component were freshly
    /// added, which is rarely what a loader wants. Entities are
    /// respawned through the normal `spawn` path (so they get fresh
    /// ids; see `snapshot.rs`), and the registry's next-id/free-id
    /// counters are then overwritten to match the snapshot's.
    pub fn deserialize(&mut self, snapshot: &WorldSnapshot) {
        #[cfg(feature = "profiling")]
        let _span = trace_span!("world.deserialize").entered();

        self.clear_entities();
        let previously_suppressed = self.suppress_hooks;
        self.suppress_hooks = true;
        for entity_data in &snapshot.entities {
            let components: Vec<(ComponentKey, Value)> = entity_data
                .components
                .iter()
                .map(|(k, v)| (ComponentKey::new(k), Value::from_json(v)))
                .collect();
            self.spawn(components);
        }
        self.suppress_hooks = previously_suppressed;
        self.registry.restore_counters(snapshot.next_id, snapshot.free_id_count);
    }

    /// Wipe all entities and archetypes back to the bootstrap empty
    /// archetype. Systems, hooks, prefabs, and patterns are untouched
    /// (used internally by `deserialize`, which wants them to keep
    /// observing the reloaded world).
    fn clear_entities(&mut self) {
        self.registry.clear();
        self.archetypes.clear();
        self.archetype_lookup.clear();
        self.index = ComponentIndex::new();
        self.query_cache.borrow_mut().clear();
        self.get_or_create_archetype(Signature::empty());
    }

    /// Full reset: entities, archetypes, systems, hooks, prefabs, and
    /// patterns all go back to their `World::new()` state.
    pub fn clear(&mut self) {
        self.clear_entities();
        self.scheduler.clear();
        self.hooks.clear();
        self.prefabs.clear();
        self.patterns.clear();
    }

    // ---- debug surface -----------------------------------------------

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            entities: self.registry.live_count(),
            archetypes: self.archetypes.len(),
            systems: self.scheduler.system_count(),
            groups: self.scheduler.group_count(),
            prefabs: self.prefabs.len(),
            patterns: self.patterns.len(),
        }
    }

    pub fn archetype_report(&self) -> Vec<ArchetypeReport> {
        self.archetypes
            .iter()
            .enumerate()
            .map(|(id, archetype)| ArchetypeReport {
                id,
                signature: archetype
                    .signature()
                    .keys()
                    .iter()
                    .map(|k| k.as_str().to_string())
                    .collect(),
                entity_count: archetype.row_count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_then_add_migrates_to_a_new_archetype() {
        let mut world = World::new();
        let e = world.spawn(vec![(ComponentKey::new("health"), Value::Int(10))]);
        world.add(e, "position", Value::Int(0));
        assert!(world.has(e, "health"));
        assert!(world.has(e, "position"));
        assert_eq!(world.get(e, "health").unwrap().as_int(), Some(10));
    }

    #[test]
    fn destroy_invalidates_the_entity_and_recycles_the_slot() {
        let mut world = World::new();
        let e = world.spawn(vec![(ComponentKey::new("tag"), Value::Int(1))]);
        world.destroy(e);
        assert!(!world.valid(e));

        let e2 = world.spawn(vec![(ComponentKey::new("tag"), Value::Int(2))]);
        assert_ne!(e, e2);
        assert!(!world.valid(e));
    }

    #[test]
    fn remove_hooks_fire_while_entity_is_still_valid() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut world = World::new();
        let seen: Rc<RefCell<Vec<(bool, i64)>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        world.on_remove("health", move |w, entity, value| {
            seen_clone.borrow_mut().push((w.valid(entity), value.as_int().unwrap()));
        });

        let e = world.spawn(vec![(ComponentKey::new("health"), Value::Int(100))]);
        world.destroy(e);

        assert_eq!(seen.borrow().as_slice(), &[(true, 100)]);
        assert!(!world.valid(e));
    }

    #[test]
    fn query_excludes_match_as_expected() {
        let mut world = World::new();
        let alive = world.spawn(vec![(ComponentKey::new("health"), Value::Int(10))]);
        let _dead = world.spawn(vec![
            (ComponentKey::new("health"), Value::Int(0)),
            (ComponentKey::new("dead"), Value::Bool(true)),
        ]);

        let query = world.query().with("health").without("dead");
        assert_eq!(query.count(&world), 1);
        assert_eq!(query.first(&world), Some(alive));
    }

    #[test]
    fn snapshot_round_trips_plain_data() {
        let mut world = World::new();
        let first = world.spawn(vec![(ComponentKey::new("health"), Value::Int(10))]);
        world.destroy(first);
        world.spawn(vec![
            (ComponentKey::new("health"), Value::Int(10)),
            (ComponentKey::new("name"), Value::Str("hero".into())),
        ]);
        let snapshot = world.serialize();
        assert_eq!(snapshot.entity_count(), 1);
        assert!(snapshot.skipped_opaque.is_empty());
        assert_eq!(snapshot.next_id, 2);
        assert_eq!(snapshot.free_id_count, 1);

        let mut restored = World::new();
        restored.deserialize(&snapshot);
        assert_eq!(restored.stats().entities, 1);
        let query = restored.query().with("health");
        assert_eq!(query.count(&restored), 1);

        let round_tripped = restored.serialize();
        assert_eq!(round_tripped.next_id, snapshot.next_id);
        assert_eq!(round_tripped.free_id_count, snapshot.free_id_count);
    }

    #[test]
    fn stats_reports_registered_prefab_and_pattern_counts() {
        let mut world = World::new();
        world.prefab("goblin", vec![(ComponentKey::new("hp"), Value::Int(5))]).unwrap();
        world
            .pattern("enemy", vec![ComponentKey::new("hp")])
            .unwrap();
        let stats = world.stats();
        assert_eq!(stats.prefabs, 1);
        assert_eq!(stats.patterns, 1);
    }

    #[test]
    fn spawn_prefab_deep_copies_template_tables() {
        let mut world = World::new();
        world
            .prefab(
                "goblin",
                vec![(ComponentKey::new("stats"), Value::table())],
            )
            .unwrap();

        let a = world.spawn_prefab("goblin", std::iter::empty()).unwrap();
        let b = world.spawn_prefab("goblin", std::iter::empty()).unwrap();

        world
            .entity(a)
            .get("stats")
            .unwrap();
        // Mutate `a`'s table in place and confirm `b` is unaffected.
        if let Some(Value::Table(map)) = world.get(a, "stats").cloned() {
            let mut map = map;
            map.insert("hp".to_string(), Value::Int(5));
            world.add(a, "stats", Value::Table(map));
        }
        assert!(world.get(b, "stats").unwrap().as_table().unwrap().is_empty());
    }
}
