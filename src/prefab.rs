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

//! Prefab and pattern registries.
//!
//! A prefab is a named default component bundle, instantiated with
//! overrides; a pattern is a named archetype signature resolved for
//! strict-equality membership queries (`get_pattern`), as opposed to
//! the query planner's subset matching.

use std::collections::HashMap;

use crate::error::{EcsError, Result};
use crate::key::{ComponentKey, Signature};
use crate::value::Value;

#[derive(Default)]
pub struct PrefabRegistry {
    /// Component order is preserved so `spawn` fires add-hooks in
    /// the same order components were registered (spec.md §4.8).
    prefabs: HashMap<String, Vec<(ComponentKey, Value)>>,
}

impl PrefabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, components: Vec<(ComponentKey, Value)>) -> Result<()> {
        let name = name.into();
        if self.prefabs.contains_key(&name) {
            return Err(EcsError::DuplicatePrefab(name));
        }
        self.prefabs.insert(name, components);
        Ok(())
    }

    pub fn template(&self, name: &str) -> Result<&[(ComponentKey, Value)]> {
        self.prefabs
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| EcsError::UnknownPrefab(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    pub fn clear(&mut self) {
        self.prefabs.clear();
    }
}

#[derive(Default)]
pub struct PatternRegistry {
    patterns: HashMap<String, Signature>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, signature: Signature) -> Result<()> {
        let name = name.into();
        if self.patterns.contains_key(&name) {
            return Err(EcsError::DuplicatePattern(name));
        }
        self.patterns.insert(name, signature);
        Ok(())
    }

    pub fn signature(&self, name: &str) -> Result<&Signature> {
        self.patterns
            .get(name)
            .ok_or_else(|| EcsError::UnknownPattern(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }
}
