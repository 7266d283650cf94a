//! Versioned document store shared by the in-memory repositories.
//!
//! Rows are kept as serialized snapshots so that every read hands out a
//! fresh aggregate and every write goes through the same serde boundary a
//! real database adapter would. All conditional writes run while holding
//! the DashMap shard lock for the key, so the version check and the write
//! are a single atomic step.

use std::fmt::Display;
use std::hash::Hash;
use std::marker::PhantomData;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::infrastructure::ports::{RepoError, Versioned};

pub(crate) struct VersionedStore<K, V> {
    entity_type: &'static str,
    rows: DashMap<K, Versioned<Value>>,
    _value: PhantomData<fn() -> V>,
}

impl<K, V> VersionedStore<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Serialize + DeserializeOwned,
{
    pub fn new(entity_type: &'static str) -> Self {
        Self {
            entity_type,
            rows: DashMap::new(),
            _value: PhantomData,
        }
    }

    fn encode(&self, value: &V) -> Result<Value, RepoError> {
        serde_json::to_value(value).map_err(RepoError::serialization)
    }

    fn decode(&self, row: &Value) -> Result<V, RepoError> {
        V::deserialize(row).map_err(RepoError::serialization)
    }

    pub fn get(&self, key: &K) -> Result<Option<Versioned<V>>, RepoError> {
        let Some(row) = self.rows.get(key) else {
            return Ok(None);
        };
        let value = self.decode(&row.value)?;
        Ok(Some(Versioned::new(row.version, value)))
    }

    /// Insert at version 1; an existing key is a constraint violation.
    pub fn insert(&self, key: K, value: &V) -> Result<u64, RepoError> {
        let encoded = self.encode(value)?;
        match self.rows.entry(key) {
            Entry::Occupied(entry) => Err(RepoError::constraint(format!(
                "{} already exists: {}",
                self.entity_type,
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(Versioned::new(1, encoded));
                Ok(1)
            }
        }
    }

    /// Unconditional write over an existing row.
    pub fn overwrite(&self, key: &K, value: &V) -> Result<u64, RepoError> {
        let encoded = self.encode(value)?;
        let mut row = self
            .rows
            .get_mut(key)
            .ok_or_else(|| RepoError::not_found(self.entity_type, key))?;
        row.version += 1;
        row.value = encoded;
        Ok(row.version)
    }

    /// Write only if the stored version is still `expected`.
    pub fn compare_and_swap(&self, key: &K, value: &V, expected: u64) -> Result<u64, RepoError> {
        let encoded = self.encode(value)?;
        let mut row = self
            .rows
            .get_mut(key)
            .ok_or_else(|| RepoError::not_found(self.entity_type, key))?;
        if row.version != expected {
            return Err(RepoError::version_conflict(
                self.entity_type,
                key,
                expected,
                row.version,
            ));
        }
        row.version += 1;
        row.value = encoded;
        Ok(row.version)
    }

    /// Insert or overwrite without any version check.
    pub fn upsert(&self, key: K, value: &V) -> Result<u64, RepoError> {
        let encoded = self.encode(value)?;
        let mut row = self
            .rows
            .entry(key)
            .or_insert_with(|| Versioned::new(0, Value::Null));
        row.version += 1;
        row.value = encoded;
        Ok(row.version)
    }

    /// Conditional upsert. `None` means "must be absent"; an absent row is
    /// reported as version 0 in conflicts.
    pub fn upsert_if_version(
        &self,
        key: K,
        value: &V,
        expected: Option<u64>,
    ) -> Result<u64, RepoError> {
        let encoded = self.encode(value)?;
        match (self.rows.entry(key), expected) {
            (Entry::Vacant(entry), None) => {
                entry.insert(Versioned::new(1, encoded));
                Ok(1)
            }
            (Entry::Vacant(entry), Some(expected)) => Err(RepoError::version_conflict(
                self.entity_type,
                entry.key(),
                expected,
                0,
            )),
            (Entry::Occupied(entry), None) => Err(RepoError::version_conflict(
                self.entity_type,
                entry.key(),
                0,
                entry.get().version,
            )),
            (Entry::Occupied(mut entry), Some(expected)) => {
                let actual = entry.get().version;
                if actual != expected {
                    return Err(RepoError::version_conflict(
                        self.entity_type,
                        entry.key(),
                        expected,
                        actual,
                    ));
                }
                let row = entry.get_mut();
                row.version += 1;
                row.value = encoded;
                Ok(row.version)
            }
        }
    }

    pub fn remove(&self, key: &K) -> bool {
        self.rows.remove(key).is_some()
    }

    /// Decode every row and keep those matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&V) -> bool) -> Result<Vec<V>, RepoError> {
        let mut out = Vec::new();
        for row in self.rows.iter() {
            let value = self.decode(&row.value)?;
            if predicate(&value) {
                out.push(value);
            }
        }
        Ok(out)
    }
}
