//! Version reference resolution

use crate::error::{ClaimdiffError, Result};
use crate::store::{BlobStore, SnapshotStore, Version};

/// A user-facing reference to a stored version: the `current`/`previous`
/// pointer aliases, or a raw version id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRef {
    Current,
    Previous,
    Id(String),
}

impl VersionRef {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "current" | "actual" => Self::Current,
            "previous" | "anterior" => Self::Previous,
            _ => Self::Id(s.to_string()),
        }
    }
}

/// Resolve a reference against the store.
pub fn resolve<'a, B: BlobStore>(
    store: &'a SnapshotStore<B>,
    version_ref: &VersionRef,
) -> Result<&'a Version> {
    match version_ref {
        VersionRef::Current => store
            .current()
            .ok_or_else(|| ClaimdiffError::version_not_found("current")),
        VersionRef::Previous => store
            .previous()
            .ok_or_else(|| ClaimdiffError::version_not_found("previous")),
        VersionRef::Id(id) => store
            .get(id)
            .ok_or_else(|| ClaimdiffError::version_not_found(id)),
    }
}
