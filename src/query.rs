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

//! Query planner: compiles a (required, excluded) component set into a
//! cached list of matching archetypes.
//!
//! `each` snapshots every matching row's component values before
//! invoking any callback (the "snapshot-before-iterate" strategy
//! spec.md §4.5/§5 recommends for predictability): callbacks are free
//! to `add`/`remove`/`destroy`/spawn entities without perturbing the
//! walk already in flight, because by the time the first callback
//! runs, the whole visit list has already been captured.

use smallvec::SmallVec;

use crate::entity::EntityId;
use crate::key::ComponentKey;
use crate::value::Value;
use crate::world::World;

/// Build the cache key spec.md §4.5 describes: `"+k"` for every
/// required key and `"-k"` for every excluded key, sorted.
pub(crate) fn cache_key(required: &[ComponentKey], excluded: &[ComponentKey]) -> String {
    let mut parts: Vec<String> = required
        .iter()
        .map(|k| format!("+{k}"))
        .chain(excluded.iter().map(|k| format!("-{k}")))
        .collect();
    parts.sort();
    parts.join(",")
}

/// A declarative `(required, excluded)` component filter over archetypes.
#[derive(Clone, Default)]
pub struct Query {
    /// Preserves the order `with()` was called in; components are
    /// handed to `each` callbacks in this order.
    required: Vec<ComponentKey>,
    excluded: Vec<ComponentKey>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<ComponentKey>) -> Self {
        self.required.push(key.into());
        self
    }

    pub fn without(mut self, key: impl Into<ComponentKey>) -> Self {
        self.excluded.push(key.into());
        self
    }

    pub fn required(&self) -> &[ComponentKey] {
        &self.required
    }

    pub fn excluded(&self) -> &[ComponentKey] {
        &self.excluded
    }

    /// Matching archetype ids, via the world's query cache.
    fn matching_archetypes(&self, world: &World) -> Vec<usize> {
        // A query with zero `with` requirements returns no matches
        // (spec.md §4.5): this forces callers to state intent.
        if self.required.is_empty() {
            return Vec::new();
        }
        world.resolve_query(&self.required, &self.excluded)
    }

    /// Sum of row counts across every matching archetype.
    pub fn count(&self, world: &World) -> usize {
        self.matching_archetypes(world)
            .into_iter()
            .map(|id| world.archetype(id).row_count())
            .sum()
    }

    /// The first entity of the first matching archetype, if any.
    pub fn first(&self, world: &World) -> Option<EntityId> {
        for id in self.matching_archetypes(world) {
            if let Some(&entity) = world.archetype(id).entities().first() {
                return Some(entity);
            }
        }
        None
    }

    /// Visit every matching entity. `callback` receives the mutable
    /// world (so it may perform structural mutations), the entity,
    /// and a slice of cloned component values in the order `with` was
    /// called.
    pub fn each(&self, world: &mut World, mut callback: impl FnMut(&mut World, EntityId, &[Value])) {
        let archetype_ids = self.matching_archetypes(world);

        let mut visits: Vec<(EntityId, SmallVec<[Value; 4]>)> = Vec::new();
        for id in archetype_ids {
            let archetype = world.archetype(id);
            let row_count = archetype.row_count();
            for row in 0..row_count {
                let entity = archetype.entities()[row];
                let values: SmallVec<[Value; 4]> = self
                    .required
                    .iter()
                    .map(|key| archetype.get(key, row).cloned().unwrap_or(Value::Null))
                    .collect();
                visits.push((entity, values));
            }
        }

        for (entity, values) in visits {
            callback(world, entity, &values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_sorted_and_sign_prefixed() {
        let required = vec![ComponentKey::new("b"), ComponentKey::new("a")];
        let excluded = vec![ComponentKey::new("c")];
        assert_eq!(cache_key(&required, &excluded), "+a,+b,-c");
    }

    #[test]
    fn empty_with_set_matches_nothing() {
        let mut world = World::new();
        world.spawn(vec![(ComponentKey::new("health"), Value::Int(10))]);
        let query = Query::new();
        assert_eq!(query.count(&world), 0);
        assert!(query.first(&world).is_none());
    }
}
