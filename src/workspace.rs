//! Workspace management and file-backed blob persistence

use crate::error::{ClaimdiffError, Result};
use crate::store::BlobStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Manages the .claimdiff workspace directory
#[derive(Debug, Clone)]
pub struct ClaimdiffWorkspace {
    /// Project root directory (where .claimdiff/ lives)
    pub root: PathBuf,
    /// .claimdiff/ directory path
    pub claimdiff_dir: PathBuf,
}

impl ClaimdiffWorkspace {
    /// Find existing workspace or create a new one
    pub fn find_or_create(start_dir: Option<&Path>) -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        let start = start_dir.unwrap_or(&current_dir);

        if let Some(workspace) = Self::find_existing(start) {
            return Ok(workspace);
        }

        Self::create_new(start.to_path_buf())
    }

    /// Find existing .claimdiff workspace by walking up directory tree
    fn find_existing(start_dir: &Path) -> Option<Self> {
        let mut current = start_dir;

        loop {
            let claimdiff_dir = current.join(".claimdiff");
            if claimdiff_dir.is_dir() {
                return Some(Self::from_root(current.to_path_buf()));
            }

            // A .git directory marks the project root; stop searching above it
            if current.join(".git").exists() {
                break;
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        None
    }

    /// Create a new workspace in the specified root directory
    pub fn create_new(root: PathBuf) -> Result<Self> {
        let workspace = Self::from_root(root);
        fs::create_dir_all(&workspace.claimdiff_dir).map_err(|e| {
            ClaimdiffError::workspace(format!(
                "cannot create {}: {}",
                workspace.claimdiff_dir.display(),
                e
            ))
        })?;
        workspace.create_config(false)?;

        log::info!("Created claimdiff workspace at: {}", workspace.root.display());
        Ok(workspace)
    }

    /// Create workspace from root directory path
    pub fn from_root(root: PathBuf) -> Self {
        let claimdiff_dir = root.join(".claimdiff");
        Self {
            root,
            claimdiff_dir,
        }
    }

    /// Path of a named blob inside the workspace
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.claimdiff_dir.join(format!("{}.json", key))
    }

    /// The file-backed blob store rooted at this workspace
    pub fn blob_store(&self) -> FileBlobStore {
        FileBlobStore {
            dir: self.claimdiff_dir.clone(),
        }
    }

    /// Create configuration file, optionally overwriting an existing one
    pub fn create_config(&self, force: bool) -> Result<()> {
        let config_path = self.claimdiff_dir.join("config.json");

        if config_path.exists() && !force {
            return Ok(());
        }

        let config = serde_json::json!({
            "version": crate::FORMAT_VERSION,
            "created": chrono::Utc::now(),
            "default_window_days": crate::DEFAULT_WINDOW_DAYS,
        });

        fs::write(config_path, serde_json::to_string_pretty(&config)?)?;
        Ok(())
    }
}

/// Blob persistence as one JSON file per key under `.claimdiff/`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.dir.join(format!("{}.json", key));
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(format!("{}.json", key)), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_creation() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = ClaimdiffWorkspace::create_new(temp_dir.path().to_path_buf()).unwrap();

        assert!(workspace.claimdiff_dir.exists());
        assert!(workspace.claimdiff_dir.join("config.json").exists());
    }

    #[test]
    fn test_find_existing_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        ClaimdiffWorkspace::create_new(temp_dir.path().to_path_buf()).unwrap();

        let nested = temp_dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = ClaimdiffWorkspace::find_or_create(Some(&nested)).unwrap();
        assert_eq!(found.root, temp_dir.path());
    }

    #[test]
    fn test_file_blob_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = ClaimdiffWorkspace::create_new(temp_dir.path().to_path_buf()).unwrap();
        let mut blobs = workspace.blob_store();

        assert!(blobs.get("versions").unwrap().is_none());
        blobs.set("versions", "{}").unwrap();
        assert_eq!(blobs.get("versions").unwrap().as_deref(), Some("{}"));
        assert!(workspace.blob_path("versions").exists());
    }
}
