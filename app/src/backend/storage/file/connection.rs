use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::backend::storage::traits::KeyValueStorage;

/// FileConnection keeps each key in its own `<key>.json` file under a data directory
#[derive(Clone)]
pub struct FileConnection {
    base_directory: PathBuf,
}

impl FileConnection {
    /// Create a new file connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("📁 Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Default data directory: ~/Documents/Daigou Ledger, falling back to the home directory
    pub fn default_data_directory() -> Result<PathBuf> {
        let root = dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(root.join("Daigou Ledger"))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// File that stores the given key
    pub fn key_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.base_directory.join(format!("{}.json", safe_key))
    }
}

impl KeyValueStorage for FileConnection {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            debug!("No stored value for '{}' at {}", key, path.display());
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
        }

        let path = self.key_path(key);
        // Write to a temp file, then rename over the real one
        let temp_path = path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&temp_path, &path)?;

        debug!("Saved '{}' ({} bytes) to {}", key, value.len(), path.display());
        Ok(())
    }
}
