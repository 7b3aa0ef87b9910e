//! Versioned snapshot store with pluggable blob persistence

use crate::claim::Claim;
use crate::diff::{self, ComparisonResult};
use crate::error::{ClaimdiffError, Result};
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Blob key for the serialized version mapping.
pub const VERSIONS_BLOB: &str = "versions";

/// Blob key for the serialized current/previous pointer pair.
pub const POINTERS_BLOB: &str = "pointers";

/// Generic string-blob persistence: read at startup, overwritten on every
/// mutation. Implemented by the workspace file store and by
/// [`MemoryBlobStore`].
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory blob store, used in tests and as the no-persistence fallback.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: std::collections::HashMap<String, String>,
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Display metadata attached to a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionMetadata {
    pub name: String,
    pub rows: usize,
}

/// An immutable point-in-time copy of the full claim set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: VersionMetadata,
    pub data: Vec<Claim>,
}

/// The current/previous pointer pair rotated on every save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct VersionPointers {
    current: Option<String>,
    previous: Option<String>,
}

/// Append-only collection of dataset versions.
///
/// Versions are never mutated or deleted; history accumulates
/// monotonically. Every mutation is written through to the blob store; a
/// failed write is logged and lost rather than aborting the operation.
pub struct SnapshotStore<B: BlobStore> {
    blobs: B,
    versions: IndexMap<String, Version>,
    pointers: VersionPointers,
    last_id_millis: i64,
}

impl<B: BlobStore> SnapshotStore<B> {
    /// Open the store, loading any persisted state. A read failure degrades
    /// to an empty in-memory store with a logged warning.
    pub fn open(blobs: B) -> Self {
        let versions = match Self::load_blob::<IndexMap<String, Version>>(&blobs, VERSIONS_BLOB) {
            Ok(versions) => versions.unwrap_or_default(),
            Err(e) => {
                log::warn!("Failed to load version mapping, starting empty: {}", e);
                IndexMap::new()
            }
        };
        let pointers = match Self::load_blob::<VersionPointers>(&blobs, POINTERS_BLOB) {
            Ok(pointers) => pointers.unwrap_or_default(),
            Err(e) => {
                log::warn!("Failed to load version pointers, starting empty: {}", e);
                VersionPointers::default()
            }
        };

        // Watermark from stored ids, so bumped ids never collide after reopen
        let last_id_millis = versions
            .keys()
            .filter_map(|id| id.strip_prefix("v_").and_then(|m| m.parse().ok()))
            .max()
            .unwrap_or(0);

        Self {
            blobs,
            versions,
            pointers,
            last_id_millis,
        }
    }

    fn load_blob<T: serde::de::DeserializeOwned>(blobs: &B, key: &str) -> Result<Option<T>> {
        match blobs.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Seed the store when no persisted state exists. Loaded state always
    /// wins over seed data.
    pub fn initialize(&mut self, seed_current: Vec<Claim>, seed_previous: Option<Vec<Claim>>) {
        if !self.versions.is_empty() {
            return;
        }

        if let Some(previous_data) = seed_previous {
            let previous = self.build_version(
                previous_data,
                VersionMetadata {
                    name: "Seed data (previous)".to_string(),
                    rows: 0,
                },
                Utc::now() - Duration::seconds(10),
            );
            self.pointers.previous = Some(previous.id.clone());
            self.versions.insert(previous.id.clone(), previous);
        }

        let current = self.build_version(
            seed_current,
            VersionMetadata {
                name: "Seed data (current)".to_string(),
                rows: 0,
            },
            Utc::now(),
        );
        self.pointers.current = Some(current.id.clone());
        self.versions.insert(current.id.clone(), current);

        self.persist();
    }

    /// Create a new version from `data`, rotate the pointer pair so it
    /// becomes current, and persist. Returns the new version's id.
    pub fn save_new_version(&mut self, data: Vec<Claim>, name: impl Into<String>) -> String {
        let metadata = VersionMetadata {
            name: name.into(),
            rows: 0,
        };
        let version = self.build_version(data, metadata, Utc::now());
        let id = version.id.clone();

        self.versions.insert(id.clone(), version);
        self.pointers = VersionPointers {
            current: Some(id.clone()),
            previous: self.pointers.current.take(),
        };

        self.persist();
        log::info!("Saved new version {}", id);
        id
    }

    fn build_version(
        &mut self,
        data: Vec<Claim>,
        mut metadata: VersionMetadata,
        timestamp: DateTime<Utc>,
    ) -> Version {
        metadata.rows = data.len();
        let id = self.next_id(timestamp);
        Version {
            id,
            timestamp,
            metadata,
            data,
        }
    }

    /// Millisecond-timestamp id with a monotonic bump so rapid successive
    /// saves never collide.
    fn next_id(&mut self, timestamp: DateTime<Utc>) -> String {
        let mut millis = timestamp.timestamp_millis();
        if millis <= self.last_id_millis {
            millis = self.last_id_millis + 1;
        }
        self.last_id_millis = millis;
        format!("v_{}", millis)
    }

    /// Look up a version by id.
    pub fn get(&self, id: &str) -> Option<&Version> {
        self.versions.get(id)
    }

    /// The version the `current` pointer designates, if any.
    pub fn current(&self) -> Option<&Version> {
        self.pointers.current.as_deref().and_then(|id| self.versions.get(id))
    }

    /// The version that was current immediately prior, if any.
    pub fn previous(&self) -> Option<&Version> {
        self.pointers.previous.as_deref().and_then(|id| self.versions.get(id))
    }

    /// All versions, newest first.
    pub fn list_history(&self) -> Vec<&Version> {
        let mut history: Vec<&Version> = self.versions.values().collect();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        history
    }

    /// Compare two versions by id. A is the current side, B the previous.
    pub fn compare(&self, version_a: &str, version_b: &str) -> Result<ComparisonResult> {
        let a = self
            .get(version_a)
            .ok_or_else(|| ClaimdiffError::version_not_found(version_a))?;
        let b = self
            .get(version_b)
            .ok_or_else(|| ClaimdiffError::version_not_found(version_b))?;
        diff::compare(&a.data, &b.data)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Write both blobs through. Failures are logged and lost: the system
    /// prioritizes continued usability over durability.
    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            log::error!("Failed to persist snapshot store, changes kept in memory only: {}", e);
        }
    }

    fn try_persist(&mut self) -> Result<()> {
        let versions = serde_json::to_string_pretty(&self.versions)?;
        let pointers = serde_json::to_string_pretty(&self.pointers)?;
        self.blobs
            .set(VERSIONS_BLOB, &versions)
            .map_err(|e| ClaimdiffError::persistence(format!("writing {}: {}", VERSIONS_BLOB, e)))?;
        self.blobs
            .set(POINTERS_BLOB, &pointers)
            .map_err(|e| ClaimdiffError::persistence(format!("writing {}: {}", POINTERS_BLOB, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Estado;

    fn claim(id: &str) -> Claim {
        Claim {
            id: id.to_string(),
            numero: id.to_string(),
            cliente: "Acme".to_string(),
            monto_reclamado: 100.0,
            monto_aceptado: 0.0,
            motivo: "N/A".to_string(),
            motivo_cliente: "N/A".to_string(),
            resolucion: "N/A".to_string(),
            fecha_calidad: String::new(),
            mail_autorizacion_abono: "no".to_string(),
            autorizacion: "N/A".to_string(),
            abono: 0.0,
            envio_a_cliente: String::new(),
            fecha_cierre: String::new(),
            dias_espera: 0,
            estado: Estado::No,
            observaciones: String::new(),
            fecha_creacion: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_save_rotates_pointers() {
        let mut store = SnapshotStore::open(MemoryBlobStore::default());

        let first = store.save_new_version(vec![claim("R-1")], "upload 1");
        assert_eq!(store.current().unwrap().id, first);
        assert!(store.previous().is_none());

        let second = store.save_new_version(vec![claim("R-1"), claim("R-2")], "upload 2");
        assert_eq!(store.current().unwrap().id, second);
        assert_eq!(store.previous().unwrap().id, first);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_unique_under_rapid_saves() {
        let mut store = SnapshotStore::open(MemoryBlobStore::default());
        let mut ids = std::collections::HashSet::new();
        for i in 0..50 {
            assert!(ids.insert(store.save_new_version(vec![], format!("v{}", i))));
        }
    }

    #[test]
    fn test_roundtrip_through_blobs() {
        let mut blobs = MemoryBlobStore::default();
        let first;
        {
            let mut store = SnapshotStore::open(std::mem::take(&mut blobs));
            first = store.save_new_version(vec![claim("R-1")], "upload 1");
            blobs = store.blobs;
        }

        let store = SnapshotStore::open(blobs);
        assert_eq!(store.len(), 1);
        assert_eq!(store.current().unwrap().id, first);
        assert_eq!(store.current().unwrap().metadata.rows, 1);
        assert_eq!(store.current().unwrap().data[0].id, "R-1");
    }

    #[test]
    fn test_initialize_seeds_only_when_empty(){
        let mut store = SnapshotStore::open(MemoryBlobStore::default());
        store.initialize(vec![claim("R-1")], Some(vec![]));
        assert_eq!(store.len(), 2);
        assert_eq!(store.current().unwrap().metadata.rows, 1);
        assert_eq!(store.previous().unwrap().metadata.rows, 0);

        // A second initialize must not touch loaded state
        store.initialize(vec![claim("R-9")], None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_history_newest_first() {
        let mut store = SnapshotStore::open(MemoryBlobStore::default());
        store.save_new_version(vec![], "a");
        store.save_new_version(vec![], "b");
        store.save_new_version(vec![], "c");

        let names: Vec<&str> = store
            .list_history()
            .iter()
            .map(|v| v.metadata.name.as_str())
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }
}
