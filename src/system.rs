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

//! System records and cooperative tasks.
//!
//! Unlike the teacher crate's `System` trait (which assumes a
//! potentially multi-threaded scheduler and bounds implementations by
//! `Send + Sync`), systems here are plain closures over a `Query` and
//! run single-threaded, so no such bound is needed.

use crate::entity::EntityId;
use crate::query::Query;
use crate::value::Value;
use crate::world::World;

/// Opaque handle to a registered system, used to toggle `enabled` or
/// attach/detach a cooperative task after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub(crate) u64);

pub type SystemCallback = Box<dyn FnMut(&mut World, EntityId, &[Value], f64)>;

/// Result of resuming a cooperative task for one tick.
pub enum TaskState {
    /// The task has more work to do on a future tick.
    Pending,
    /// The task is finished; the scheduler detaches it.
    Done,
}

/// Long-running work attached to a system, resumed once per dispatch
/// with the tick's `dt` instead of running the system's query.
pub trait CoroutineTask {
    fn resume(&mut self, world: &mut World, dt: f64) -> TaskState;
}

pub(crate) struct SystemEntry {
    pub id: SystemId,
    pub query: Query,
    pub callback: SystemCallback,
    pub enabled: bool,
    pub priority: i32,
    pub task: Option<Box<dyn CoroutineTask>>,
}

impl SystemEntry {
    pub fn dispatch(&mut self, world: &mut World, dt: f64) {
        if !self.enabled {
            return;
        }
        if let Some(task) = self.task.as_mut() {
            if matches!(task.resume(world, dt), TaskState::Done) {
                self.task = None;
            }
            return;
        }
        let callback = &mut self.callback;
        self.query.each(world, |world, entity, values| {
            callback(world, entity, values, dt);
        });
    }
}
