use sextant_core::stmt::{Row, Value};

use std::collections::HashMap;

/// Foreign-key resolution cache, owned by one transaction.
///
/// Resolved natural keys are kept per resolver, identified by the table
/// it queries and the paths it matches on. Each resolver gets its own
/// [`Generations`] bounded by the same capacity.
#[derive(Debug)]
pub struct FkCache {
    capacity: usize,
    resolvers: HashMap<CacheKey, Generations>,
}

/// Identifies a resolver: target table and matched paths
pub type CacheKey = (String, Vec<String>);

/// Two-generation cache with clock-style eviction.
///
/// Lookups check `recent` first, then `older`; a hit in `older` is promoted
/// to `recent`. Inserts land in `recent`. Once both generations together
/// hold more than `capacity` entries, `older` is discarded and `recent`
/// takes its place.
#[derive(Debug)]
pub struct Generations {
    capacity: usize,
    recent: HashMap<Row, Value>,
    older: HashMap<Row, Value>,
}

impl FkCache {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new(capacity: usize) -> FkCache {
        FkCache {
            capacity,
            resolvers: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The generations of one resolver, created on first use
    pub fn resolver(&mut self, key: &CacheKey) -> &mut Generations {
        let capacity = self.capacity;
        self.resolvers
            .entry(key.clone())
            .or_insert_with(|| Generations::new(capacity))
    }
}

impl Default for FkCache {
    fn default() -> Self {
        FkCache::new(FkCache::DEFAULT_CAPACITY)
    }
}

impl Generations {
    pub fn new(capacity: usize) -> Generations {
        Generations {
            capacity,
            recent: HashMap::new(),
            older: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &Row) -> Option<Value> {
        if let Some(value) = self.recent.get(key) {
            tracing::trace!(?key, "fk cache hit");
            return Some(value.clone());
        }

        if let Some(value) = self.older.remove(key) {
            tracing::trace!(?key, "fk cache hit, promoted");
            self.recent.insert(key.clone(), value.clone());
            self.vacuum();
            return Some(value);
        }

        tracing::trace!(?key, "fk cache miss");
        None
    }

    pub fn insert(&mut self, key: Row, value: Value) {
        self.recent.insert(key, value);
        self.vacuum();
    }

    pub fn contains(&self, key: &Row) -> bool {
        self.recent.contains_key(key) || self.older.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.recent.len() + self.older.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn vacuum(&mut self) {
        if self.len() > self.capacity {
            tracing::trace!(capacity = self.capacity, "fk cache rotated");
            self.older = std::mem::take(&mut self.recent);
        }
    }
}
