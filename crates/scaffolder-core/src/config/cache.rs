//! On-disk cache of the remote template listing

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Folder under the home directory holding the cache file
pub const CACHE_FOLDER: &str = ".cache";

/// JSON file holding the last registry response
#[derive(Debug, Clone)]
pub struct ListingCache {
    path: PathBuf,
}

impl ListingCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.cache/<file_name>`, if a home directory is known
    pub fn in_home(file_name: &str) -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(CACHE_FOLDER).join(file_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))
    }

    /// Replace the cache contents, creating the folder if needed
    pub async fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
