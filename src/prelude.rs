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

//! Convenient re-exports of commonly used types.
//!
//! ```
//! use dynecs::prelude::*;
//! ```

pub use crate::entity::EntityId;
pub use crate::error::{EcsError, Result};
pub use crate::key::{ComponentKey, Signature};
pub use crate::query::Query;
pub use crate::system::{CoroutineTask, SystemId, TaskState};
pub use crate::value::Value;
pub use crate::world::World;
