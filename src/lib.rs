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

//! dynecs - Archetype-based ECS over opaque, dynamically-typed components.
//!
//! Components are identified at runtime by string keys rather than
//! Rust types, so the same `World` can host entities assembled from
//! component vocabularies only known at load time (scripted content,
//! data-driven prefabs, hot-reloaded schemas). Storage is still
//! archetype/struct-of-arrays underneath; only the key type changed.

pub mod archetype;
pub mod debug;
pub mod entity;
pub mod error;
pub mod handle;
pub mod hooks;
pub mod index;
pub mod key;
pub mod prefab;
pub mod query;
pub mod scheduler;
pub mod snapshot;
pub mod system;
pub mod value;
pub mod world;

pub mod prelude;

pub use archetype::Archetype;
pub use debug::{ArchetypeReport, WorldStats};
pub use entity::EntityId;
pub use error::{EcsError, Result};
pub use handle::EntityHandle;
pub use key::{ComponentKey, Signature};
pub use prefab::{PatternRegistry, PrefabRegistry};
pub use query::Query;
pub use scheduler::Scheduler;
pub use snapshot::{SnapshotEntity, WorldSnapshot};
pub use system::{CoroutineTask, SystemId, TaskState};
pub use value::Value;
pub use world::World;
