//! Fixed-name static asset cache.
//!
//! One cache, keyed by a version tag baked into its name; invalidation is
//! "ship a new name", nothing finer.

use std::collections::HashMap;

use bytes::Bytes;

#[derive(Debug)]
pub struct AssetCache {
    name: String,
    entries: HashMap<String, Bytes>,
}

impl AssetCache {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert(&mut self, path: impl Into<String>, body: Bytes) {
        self.entries.insert(path.into(), body);
    }

    pub fn lookup(&self, path: &str) -> Option<Bytes> {
        self.entries.get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
