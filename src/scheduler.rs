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

//! System scheduler: priority-ordered dispatch, plus independently
//! ordered named groups.
//!
//! Concurrency model is single-threaded cooperative by default (spec.md
//! §5): a group's `parallel_hint` is stored but never acted on here —
//! a parallel dispatcher would need its own static write/read analysis
//! of each system's query, which spec.md explicitly keeps out of scope.

use crate::error::{EcsError, Result};
use crate::query::Query;
use crate::system::{CoroutineTask, SystemCallback, SystemEntry, SystemId};
use crate::world::World;

struct SystemGroup {
    name: String,
    enabled: bool,
    parallel_hint: bool,
    systems: Vec<SystemEntry>,
}

impl SystemGroup {
    fn run(&mut self, world: &mut World, dt: f64) {
        for entry in &mut self.systems {
            entry.dispatch(world, dt);
        }
    }
}

#[derive(Default)]
pub struct Scheduler {
    ungrouped: Vec<SystemEntry>,
    groups: Vec<SystemGroup>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> SystemId {
        let id = SystemId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert_sorted(list: &mut Vec<SystemEntry>, entry: SystemEntry) {
        let pos = list
            .iter()
            .position(|existing| existing.priority > entry.priority)
            .unwrap_or(list.len());
        list.insert(pos, entry);
    }

    /// Register an ungrouped system, sorted into the global list by
    /// ascending priority (lower runs first).
    pub fn system(&mut self, query: Query, callback: SystemCallback, priority: i32) -> SystemId {
        let id = self.alloc_id();
        let entry = SystemEntry {
            id,
            query,
            callback,
            enabled: true,
            priority,
            task: None,
        };
        Self::insert_sorted(&mut self.ungrouped, entry);
        id
    }

    pub fn system_group(&mut self, name: impl Into<String>, parallel_hint: bool) -> Result<()> {
        let name = name.into();
        if self.groups.iter().any(|g| g.name == name) {
            return Err(EcsError::DuplicateSystemGroup(name));
        }
        self.groups.push(SystemGroup {
            name,
            enabled: true,
            parallel_hint,
            systems: Vec::new(),
        });
        Ok(())
    }

    pub fn system_in_group(
        &mut self,
        group: &str,
        query: Query,
        callback: SystemCallback,
        priority: i32,
    ) -> Result<SystemId> {
        let id = self.alloc_id();
        let entry = SystemEntry {
            id,
            query,
            callback,
            enabled: true,
            priority,
            task: None,
        };
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.name == group)
            .ok_or_else(|| EcsError::UnknownSystemGroup(group.to_string()))?;
        Self::insert_sorted(&mut group.systems, entry);
        Ok(id)
    }

    pub fn set_group_enabled(&mut self, group: &str, enabled: bool) -> Result<()> {
        self.groups
            .iter_mut()
            .find(|g| g.name == group)
            .map(|g| g.enabled = enabled)
            .ok_or_else(|| EcsError::UnknownSystemGroup(group.to_string()))
    }

    pub fn set_enabled(&mut self, id: SystemId, enabled: bool) {
        if let Some(entry) = self.ungrouped.iter_mut().find(|e| e.id == id) {
            entry.enabled = enabled;
            return;
        }
        for group in &mut self.groups {
            if let Some(entry) = group.systems.iter_mut().find(|e| e.id == id) {
                entry.enabled = enabled;
                return;
            }
        }
    }

    pub fn attach_task(&mut self, id: SystemId, task: Box<dyn CoroutineTask>) {
        if let Some(entry) = self.ungrouped.iter_mut().find(|e| e.id == id) {
            entry.task = Some(task);
            return;
        }
        for group in &mut self.groups {
            if let Some(entry) = group.systems.iter_mut().find(|e| e.id == id) {
                entry.task = Some(task);
                return;
            }
        }
    }

    pub fn detach_task(&mut self, id: SystemId) {
        if let Some(entry) = self.ungrouped.iter_mut().find(|e| e.id == id) {
            entry.task = None;
            return;
        }
        for group in &mut self.groups {
            if let Some(entry) = group.systems.iter_mut().find(|e| e.id == id) {
                entry.task = None;
                return;
            }
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn system_count(&self) -> usize {
        self.ungrouped.len() + self.groups.iter().map(|g| g.systems.len()).sum::<usize>()
    }

    /// Run every enabled ungrouped system in priority order, then
    /// every enabled group (in registration order) and its enabled
    /// systems in priority order.
    pub fn update(&mut self, world: &mut World, dt: f64) {
        for entry in &mut self.ungrouped {
            entry.dispatch(world, dt);
        }
        for group in &mut self.groups {
            if group.enabled {
                group.run(world, dt);
            }
        }
    }

    /// Run only the named group, irrespective of its own `enabled`
    /// flag (an explicit call to run a group overrides the flag meant
    /// to gate it out of the normal `update` sweep); each system in
    /// it still respects its own `enabled` flag.
    pub fn update_group(&mut self, world: &mut World, name: &str, dt: f64) -> Result<()> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| EcsError::UnknownSystemGroup(name.to_string()))?;
        group.run(world, dt);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.ungrouped.clear();
        self.groups.clear();
        self.next_id = 0;
    }
}
