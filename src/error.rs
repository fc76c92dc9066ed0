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

//! Error types
//!
//! The core has no I/O of its own, so there is no I/O error variant.
//! Operations on unknown entities are no-ops, not errors (see the
//! handle API in `handle.rs`); only unknown names in the prefab,
//! pattern, and group registries are treated as caller bugs worth a
//! `Result`.

use std::fmt;

/// ECS error type
#[derive(Debug, Clone)]
pub enum EcsError {
    /// `spawn(name)` referenced a prefab that was never registered
    UnknownPrefab(String),

    /// `get_pattern(name)` / `pattern(name, ..)` referenced a pattern
    /// name that conflicts with an existing registration
    UnknownPattern(String),

    /// `system_in_group(group, ..)` referenced a group that was never
    /// registered
    UnknownSystemGroup(String),

    /// `system_group(name, ..)` registered twice
    DuplicateSystemGroup(String),

    /// `prefab(name, ..)` registered twice
    DuplicatePrefab(String),

    /// `pattern(name, ..)` registered twice
    DuplicatePattern(String),

    /// Snapshot contained data that could not be restored
    DeserializationError(String),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::UnknownPrefab(name) => write!(f, "unknown prefab: {name}"),
            EcsError::UnknownPattern(name) => write!(f, "unknown pattern: {name}"),
            EcsError::UnknownSystemGroup(name) => write!(f, "unknown system group: {name}"),
            EcsError::DuplicateSystemGroup(name) => {
                write!(f, "system group already registered: {name}")
            }
            EcsError::DuplicatePrefab(name) => write!(f, "prefab already registered: {name}"),
            EcsError::DuplicatePattern(name) => write!(f, "pattern already registered: {name}"),
            EcsError::DeserializationError(msg) => write!(f, "failed to restore snapshot: {msg}"),
        }
    }
}

impl std::error::Error for EcsError {}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;
