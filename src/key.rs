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

//! Component keys and archetype signatures.
//!
//! Components are identified by opaque runtime keys rather than Rust
//! types. A `ComponentKey` interns its string once and is cheap to
//! clone and compare afterwards; a `Signature` is the sorted,
//! duplicate-free sequence of keys that names an archetype.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

fn interner() -> &'static Mutex<FxHashSet<Arc<str>>> {
    static INTERNER: OnceLock<Mutex<FxHashSet<Arc<str>>>> = OnceLock::new();
    INTERNER.get_or_init(|| Mutex::new(FxHashSet::default()))
}

/// An opaque, orderable, hashable component identifier.
///
/// Two keys built from equal strings are equal and compare equal
/// under `Ord`/`Hash` regardless of which call site interned them.
#[derive(Clone, Eq)]
pub struct ComponentKey(Arc<str>);

impl ComponentKey {
    /// Intern `name`, reusing a previously-interned `Arc<str>` if one exists.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let table = interner();
        if let Some(existing) = table.lock().get(name) {
            return Self(existing.clone());
        }
        let arc: Arc<str> = Arc::from(name);
        table.lock().insert(arc.clone());
        Self(arc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ComponentKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl std::hash::Hash for ComponentKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for ComponentKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComponentKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ComponentKey {
    fn from(value: &str) -> Self {
        ComponentKey::new(value)
    }
}

impl From<String> for ComponentKey {
    fn from(value: String) -> Self {
        ComponentKey::new(value)
    }
}

/// The canonical sorted, duplicate-free sequence of keys describing
/// an archetype. The empty signature is a legal signature.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Signature(Vec<ComponentKey>);

impl Signature {
    pub fn empty() -> Self {
        Signature(Vec::new())
    }

    /// Build a canonical signature from an arbitrary key set.
    pub fn from_keys(mut keys: Vec<ComponentKey>) -> Self {
        keys.sort();
        keys.dedup();
        Signature(keys)
    }

    pub fn keys(&self) -> &[ComponentKey] {
        &self.0
    }

    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.0.binary_search(key).is_ok()
    }

    /// Canonical signature with `key` inserted (no-op if already present).
    pub fn with(&self, key: &ComponentKey) -> Signature {
        if self.contains(key) {
            return self.clone();
        }
        let mut keys = self.0.clone();
        keys.push(key.clone());
        keys.sort();
        Signature(keys)
    }

    /// Canonical signature with `key` removed (no-op if absent).
    pub fn without(&self, key: &ComponentKey) -> Signature {
        if !self.contains(key) {
            return self.clone();
        }
        let keys: Vec<ComponentKey> = self.0.iter().filter(|k| *k != key).cloned().collect();
        Signature(keys)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_set(&self) -> HashSet<ComponentKey> {
        self.0.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_reuses_storage() {
        let a = ComponentKey::new("health");
        let b = ComponentKey::new("health");
        assert_eq!(a, b);
    }

    #[test]
    fn signature_is_sorted_and_deduped() {
        let sig = Signature::from_keys(vec![
            ComponentKey::new("position"),
            ComponentKey::new("health"),
            ComponentKey::new("health"),
        ]);
        let names: Vec<&str> = sig.keys().iter().map(ComponentKey::as_str).collect();
        assert_eq!(names, vec!["health", "position"]);
    }

    #[test]
    fn with_and_without_are_inverse_on_membership() {
        let base = Signature::from_keys(vec![ComponentKey::new("a")]);
        let k = ComponentKey::new("b");
        let extended = base.with(&k);
        assert!(extended.contains(&k));
        let reduced = extended.without(&k);
        assert_eq!(reduced, base);
    }
}
