use std::hash::Hash;

use dashmap::DashMap;

use crate::{cache::Cache, Result};

/// Unbounded in-memory store, entries live until removed or cleared
pub struct PerpetualCache<K, V> {
    id: String,
    entries: DashMap<K, V>,
}

impl<K, V> PerpetualCache<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty store named `id`
    pub fn new(id: impl Into<String>) -> Self {
        PerpetualCache {
            id: id.into(),
            entries: DashMap::new(),
        }
    }
}

impl<K, V> Cache<K, V> for PerpetualCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn put(&self, key: K, value: V) -> Result<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn remove(&self, key: &K) -> Result<Option<V>> {
        Ok(self.entries.remove(key).map(|(_, value)| value))
    }

    fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn size(&self) -> usize {
        self.entries.len()
    }
}
