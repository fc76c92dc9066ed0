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

//! Reactive hooks: callbacks fired on component insertion and removal.

use rustc_hash::FxHashMap;

use crate::entity::EntityId;
use crate::key::ComponentKey;
use crate::value::Value;
use crate::world::World;

pub type HookCallback = Box<dyn FnMut(&mut World, EntityId, &Value)>;

/// Per-key callback lists for `on_add`/`on_remove`.
#[derive(Default)]
pub struct HookRegistry {
    on_add: FxHashMap<ComponentKey, Vec<HookCallback>>,
    on_remove: FxHashMap<ComponentKey, Vec<HookCallback>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_add(&mut self, key: ComponentKey, callback: HookCallback) {
        self.on_add.entry(key).or_default().push(callback);
    }

    pub fn register_remove(&mut self, key: ComponentKey, callback: HookCallback) {
        self.on_remove.entry(key).or_default().push(callback);
    }

    /// Pull the callback list for `key` out of the registry so it can
    /// be invoked with `&mut World` without aliasing `world.hooks`.
    pub fn take_add(&mut self, key: &ComponentKey) -> Vec<HookCallback> {
        self.on_add.get_mut(key).map(std::mem::take).unwrap_or_default()
    }

    pub fn take_remove(&mut self, key: &ComponentKey) -> Vec<HookCallback> {
        self.on_remove.get_mut(key).map(std::mem::take).unwrap_or_default()
    }

    /// Put callbacks back after firing, preserving registration order
    /// and keeping any callbacks registered while firing was underway.
    pub fn restore_add(&mut self, key: ComponentKey, mut fired: Vec<HookCallback>) {
        let slot = self.on_add.entry(key).or_default();
        fired.append(slot);
        *slot = fired;
    }

    pub fn restore_remove(&mut self, key: ComponentKey, mut fired: Vec<HookCallback>) {
        let slot = self.on_remove.entry(key).or_default();
        fired.append(slot);
        *slot = fired;
    }

    pub fn clear(&mut self) {
        self.on_add.clear();
        self.on_remove.clear();
    }
}
