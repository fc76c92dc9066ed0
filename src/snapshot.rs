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

//! World snapshot: dumps and restores full world state.
//!
//! The wire format is an opaque `serde`-friendly structure matching
//! spec.md §4.10/§6: a next-id counter, a free-id count, and a
//! sequence of per-entity `{id, {component_key -> json_value}}`
//! records. It carries no version field and no schema-stability
//! guarantee across runs — wire encoding is the caller's choice,
//! `serde_json::to_string`/`from_str` being the obvious one given the
//! crate's existing `serde_json` dependency.
//!
//! `id` round-trips for informational/debugging purposes only;
//! `World::deserialize` re-allocates fresh ids on restore rather than
//! forcing the original ones back (see DESIGN.md), so an id read back
//! from a snapshot should not be assumed to name a live entity until
//! matched against the restored world's own ids.
//!
//! `Value::Opaque` components have no JSON form and are dropped rather
//! than silently corrupted; their keys are reported back in
//! `skipped_opaque` so callers can decide whether that is acceptable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// One entity's component data, keyed by component name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntity {
    pub id: EntityId,
    pub components: BTreeMap<String, serde_json::Value>,
}

/// A full, in-memory dump of world state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldSnapshot {
    /// Total ids ever allocated at the time of the snapshot.
    pub next_id: u64,
    /// Number of currently-vacant, reusable entity slots.
    pub free_id_count: usize,
    pub entities: Vec<SnapshotEntity>,
    /// `"{entity_debug}:{component_key}"` for every component value
    /// that could not be represented as JSON (i.e. `Value::Opaque`).
    pub skipped_opaque: Vec<String>,
}

impl WorldSnapshot {
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}
