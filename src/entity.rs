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

//! Entity identifiers and the entity registry.
//!
//! `EntityId` is a slotmap key, which gives us the (slot, generation)
//! pair spec.md asks for without hand-rolling a free list: destroying
//! an entity removes its slotmap entry, and a later `entity()` call
//! that reuses the slot bumps the generation automatically, so a
//! stale handle held across that reuse fails `valid()`.
//!
//! `allocated`/`recycled` track the same two counters spec.md §4.10's
//! snapshot format names (a monotonic next-id counter and a free-id
//! count); slotmap owns the actual generation arithmetic, so these
//! exist purely to be carried through `World::serialize`/`deserialize`.

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Unique entity identifier. Opaque; callers should treat it as a
    /// cheap, copyable handle and never interpret its bits.
    pub struct EntityId;
}

/// Where a live entity's row currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRecord {
    pub archetype_id: usize,
    pub row: usize,
}

/// Allocates, recycles, and validates entity identifiers, and maps
/// each live entity to its current archetype and row.
#[derive(Default)]
pub struct EntityRegistry {
    records: SlotMap<EntityId, EntityRecord>,
    /// Number of currently-vacant, reusable slots (the "free-id list").
    recycled: usize,
    /// Total ids ever allocated (the "next-id counter"); never decreases.
    allocated: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            records: SlotMap::with_key(),
            recycled: 0,
            allocated: 0,
        }
    }

    /// Allocate a new id with a placeholder record; callers must
    /// immediately follow up with `set_record`.
    pub fn new_id(&mut self, placeholder: EntityRecord) -> EntityId {
        let id = self.records.insert(placeholder);
        self.allocated += 1;
        if self.recycled > 0 {
            self.recycled -= 1;
        }
        id
    }

    pub fn record(&self, id: EntityId) -> Option<EntityRecord> {
        self.records.get(id).copied()
    }

    pub fn set_record(&mut self, id: EntityId, record: EntityRecord) {
        if let Some(slot) = self.records.get_mut(id) {
            *slot = record;
        }
    }

    /// Release `id` to the free list. Returns `false` if the id was
    /// already invalid (caller treats this as a no-op, per spec.md §7).
    pub fn release(&mut self, id: EntityId) -> bool {
        if self.records.remove(id).is_some() {
            self.recycled += 1;
            true
        } else {
            false
        }
    }

    pub fn valid(&self, id: EntityId) -> bool {
        self.records.contains_key(id)
    }

    pub fn live_count(&self) -> usize {
        self.records.len()
    }

    /// Total ids ever allocated; spec.md §4.10's "next-id counter".
    pub fn allocated_count(&self) -> u64 {
        self.allocated
    }

    /// Currently-vacant, reusable slots; spec.md §4.10's "free-id list".
    pub fn free_count(&self) -> usize {
        self.recycled
    }

    /// Overwrite the bookkeeping counters, used by `World::deserialize`
    /// to carry a snapshot's counters through a restore that otherwise
    /// reallocates every entity from scratch.
    pub fn restore_counters(&mut self, allocated: u64, recycled: usize) {
        self.allocated = allocated;
        self.recycled = recycled;
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, EntityRecord)> + '_ {
        self.records.iter().map(|(id, rec)| (id, *rec))
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.recycled = 0;
        self.allocated = 0;
    }
}
