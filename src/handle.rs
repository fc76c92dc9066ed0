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

//! User-facing entity handle: `add`, `remove`, `get`, `has`, `destroy`,
//! `valid`, chained through a borrow of the world.

use crate::entity::EntityId;
use crate::key::ComponentKey;
use crate::value::Value;
use crate::world::World;

/// A cheap, chainable handle bound to one entity and a mutable borrow
/// of its world. All operations delegate to `World`; this type exists
/// purely for the ergonomic `world.entity(id).add(..).add(..)` call
/// chain spec.md §4.6 describes.
pub struct EntityHandle<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl<'w> EntityHandle<'w> {
    pub(crate) fn new(world: &'w mut World, id: EntityId) -> Self {
        Self { world, id }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn valid(&self) -> bool {
        self.world.valid(self.id)
    }

    pub fn has(&self, key: impl Into<ComponentKey>) -> bool {
        self.world.has(self.id, key)
    }

    pub fn get(&self, key: impl Into<ComponentKey>) -> Option<&Value> {
        self.world.get(self.id, key)
    }

    pub fn add(self, key: impl Into<ComponentKey>, value: impl Into<Value>) -> Self {
        self.world.add(self.id, key, value);
        self
    }

    pub fn remove(self, key: impl Into<ComponentKey>) -> Self {
        self.world.remove(self.id, key);
        self
    }

    pub fn destroy(self) {
        self.world.destroy(self.id);
    }
}
