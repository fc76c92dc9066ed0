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

//! Debug surface: world-level counters for humans inspecting a
//! running world (spec.md §6 "Debug surface").

/// Snapshot of world-level counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub entities: usize,
    pub archetypes: usize,
    pub systems: usize,
    pub groups: usize,
    pub prefabs: usize,
    pub patterns: usize,
}

/// Per-archetype inspection summary.
#[derive(Debug, Clone)]
pub struct ArchetypeReport {
    pub id: usize,
    pub signature: Vec<String>,
    pub entity_count: usize,
}
