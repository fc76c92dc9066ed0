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

//! Component reverse index: key -> archetypes containing it.
//!
//! Archetypes are never destroyed (spec.md §3/§9), so this index only
//! ever grows; query planning walks the smallest matching bucket
//! instead of scanning the whole archetype table.

use ahash::AHashMap;

use crate::key::ComponentKey;

#[derive(Default)]
pub struct ComponentIndex {
    buckets: AHashMap<ComponentKey, Vec<usize>>,
}

impl ComponentIndex {
    pub fn new() -> Self {
        Self {
            buckets: AHashMap::new(),
        }
    }

    /// Register a freshly created archetype under every key in its signature.
    pub fn register_archetype(&mut self, archetype_id: usize, keys: &[ComponentKey]) {
        for key in keys {
            self.buckets.entry(key.clone()).or_default().push(archetype_id);
        }
    }

    pub fn bucket(&self, key: &ComponentKey) -> &[usize] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The key whose bucket is smallest, used by the query planner to
    /// minimize the number of archetypes it has to test.
    pub fn smallest_bucket<'a>(&self, keys: &'a [ComponentKey]) -> Option<&'a ComponentKey> {
        keys.iter().min_by_key(|k| self.bucket(k).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_bucket_picks_least_populated_key() {
        let mut index = ComponentIndex::new();
        let health = ComponentKey::new("health");
        let position = ComponentKey::new("position");
        index.register_archetype(0, &[health.clone()]);
        index.register_archetype(1, &[health.clone()]);
        index.register_archetype(2, &[health.clone(), position.clone()]);

        let keys = vec![health.clone(), position.clone()];
        let smallest = index.smallest_bucket(&keys).unwrap();
        assert_eq!(smallest, &position);
    }
}
