//! Test utilities for file-backed storage with automatic cleanup
//!
//! The temporary directory lives as long as the environment, so test data is
//! removed even if a test panics.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::FileConnection;

/// RAII test environment around a temporary data directory
pub struct TestEnvironment {
    /// Kept alive so the directory is only removed on drop
    _temp_dir: TempDir,
    pub connection: FileConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = FileConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    /// Same as `new`, with a recognisable directory prefix for debugging
    pub fn new_with_prefix(prefix: &str) -> Result<Self> {
        let temp_dir = TempDir::with_prefix(prefix)?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = FileConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("DAIGOU_DEBUG_TESTS").is_ok() {
            println!("🧹 Cleaning up test environment: {:?}", self.base_path);
        }
    }
}
