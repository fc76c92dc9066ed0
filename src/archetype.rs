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

//! Archetype storage (struct-of-arrays) and the archetype graph.
//!
//! An archetype holds every entity that shares exactly one component
//! signature. Each component is stored in its own contiguous column;
//! `add_edge`/`remove_edge` cache, per component key, which archetype
//! is reached by adding or removing that key, making structural
//! mutation O(1) amortized after the edge has been walked once.

use std::collections::HashSet;

use rustc_hash::FxHashMap;

use crate::entity::EntityId;
use crate::key::{ComponentKey, Signature};
use crate::value::Value;

/// Struct-of-arrays storage for every entity sharing one signature.
pub struct Archetype {
    signature: Signature,
    component_set: HashSet<ComponentKey>,
    entities: Vec<EntityId>,
    columns: FxHashMap<ComponentKey, Vec<Value>>,
    /// `add_edge[k]` is the archetype reached by adding `k`, lazily populated.
    add_edge: FxHashMap<ComponentKey, usize>,
    /// `remove_edge[k]` is the archetype reached by removing `k`, lazily populated.
    remove_edge: FxHashMap<ComponentKey, usize>,
}

impl Archetype {
    pub fn new(signature: Signature) -> Self {
        let component_set = signature.as_set();
        let mut columns = FxHashMap::default();
        for key in signature.keys() {
            columns.insert(key.clone(), Vec::new());
        }
        Self {
            signature,
            component_set,
            entities: Vec::new(),
            columns,
            add_edge: FxHashMap::default(),
            remove_edge: FxHashMap::default(),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.component_set.contains(key)
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn row_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn column(&self, key: &ComponentKey) -> Option<&[Value]> {
        self.columns.get(key).map(Vec::as_slice)
    }

    /// Append a new row. `values` must cover exactly this archetype's
    /// signature (missing or extra keys are a programming error, per
    /// spec.md §4.2, and will panic rather than silently corrupt a
    /// column).
    pub fn add_row(&mut self, entity: EntityId, mut values: FxHashMap<ComponentKey, Value>) -> usize {
        let row = self.entities.len();
        self.entities.push(entity);
        for key in self.signature.keys() {
            let value = values
                .remove(key)
                .unwrap_or_else(|| panic!("add_row missing value for component {key:?}"));
            self.columns.get_mut(key).unwrap().push(value);
        }
        debug_assert!(
            values.is_empty(),
            "add_row received values for components outside the archetype signature"
        );
        row
    }

    /// Swap-remove `row`. Returns the id of the entity that was moved
    /// into the vacated slot, if any. Vec::swap_remove drops the
    /// removed `Value` in place, which is how columns release any
    /// references the removed row held.
    pub fn remove_row(&mut self, row: usize) -> Option<EntityId> {
        if row >= self.entities.len() {
            return None;
        }
        self.entities.swap_remove(row);
        for column in self.columns.values_mut() {
            column.swap_remove(row);
        }
        if row < self.entities.len() {
            Some(self.entities[row])
        } else {
            None
        }
    }

    pub fn get(&self, key: &ComponentKey, row: usize) -> Option<&Value> {
        self.columns.get(key).and_then(|col| col.get(row))
    }

    pub fn get_mut(&mut self, key: &ComponentKey, row: usize) -> Option<&mut Value> {
        self.columns.get_mut(key).and_then(|col| col.get_mut(row))
    }

    pub fn set(&mut self, key: &ComponentKey, row: usize, value: Value) {
        if let Some(slot) = self.columns.get_mut(key).and_then(|col| col.get_mut(row)) {
            *slot = value;
        }
    }

    pub fn take(&mut self, key: &ComponentKey, row: usize) -> Option<Value> {
        self.columns
            .get_mut(key)
            .and_then(|col| col.get_mut(row))
            .map(|slot| std::mem::replace(slot, Value::Null))
    }

    /// Snapshot all component values at `row` as a (key, value) map.
    pub fn row_values(&self, row: usize) -> FxHashMap<ComponentKey, Value> {
        let mut out = FxHashMap::default();
        for key in self.signature.keys() {
            if let Some(value) = self.get(key, row) {
                out.insert(key.clone(), value.clone());
            }
        }
        out
    }

    pub fn add_edge(&self, key: &ComponentKey) -> Option<usize> {
        self.add_edge.get(key).copied()
    }

    pub fn set_add_edge(&mut self, key: ComponentKey, target: usize) {
        self.add_edge.insert(key, target);
    }

    pub fn remove_edge(&self, key: &ComponentKey) -> Option<usize> {
        self.remove_edge.get(key).copied()
    }

    pub fn set_remove_edge(&mut self, key: ComponentKey, target: usize) {
        self.remove_edge.insert(key, target);
    }

    /// Invariant check used by tests and debug assertions: column
    /// lengths all agree with the entity count.
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) {
        for key in self.signature.keys() {
            let col = self.columns.get(key).expect("column missing for signature key");
            debug_assert_eq!(col.len(), self.entities.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(pairs: &[(&str, Value)]) -> FxHashMap<ComponentKey, Value> {
        pairs
            .iter()
            .map(|(k, v)| (ComponentKey::new(*k), v.clone()))
            .collect()
    }

    #[test]
    fn column_lengths_track_row_count() {
        let sig = Signature::from_keys(vec![ComponentKey::new("tag")]);
        let mut registry = slotmap::SlotMap::<EntityId, ()>::with_key();
        let mut arch = Archetype::new(sig.clone());
        let e1 = registry.insert(());
        let e2 = registry.insert(());
        arch.add_row(e1, kv(&[("tag", Value::Int(1))]));
        arch.add_row(e2, kv(&[("tag", Value::Int(2))]));
        assert_eq!(arch.row_count(), 2);
        assert_eq!(arch.column(&ComponentKey::new("tag")).unwrap().len(), 2);

        let swapped = arch.remove_row(0);
        assert_eq!(swapped, Some(e2));
        assert_eq!(arch.row_count(), 1);
        assert_eq!(arch.get(&ComponentKey::new("tag"), 0).unwrap().as_int(), Some(2));
    }
}
