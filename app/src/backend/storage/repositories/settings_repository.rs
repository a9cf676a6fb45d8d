use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::storage::traits::KeyValueStorage;

/// Key holding the last used cost exchange rate
pub const DEFAULT_RATE_KEY: &str = "daigou_default_rate";

/// Remembers the last cost rate entered so the next form starts with it
#[derive(Clone)]
pub struct SettingsRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl SettingsRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Last used rate, `None` when absent or unreadable
    pub fn load_default_rate(&self) -> Option<f64> {
        match self.storage.get(DEFAULT_RATE_KEY) {
            Ok(Some(raw)) => {
                let parsed = raw.trim().parse::<f64>().ok().filter(|r| r.is_finite());
                if parsed.is_none() {
                    warn!("Ignoring unreadable default rate: {:?}", raw);
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read default rate: {}", e);
                None
            }
        }
    }

    pub fn save_default_rate(&self, rate: f64) -> Result<()> {
        debug!("Saving default rate {}", rate);
        self.storage.put(DEFAULT_RATE_KEY, &rate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::MemoryStorage;

    #[test]
    fn test_round_trip() {
        let repo = SettingsRepository::new(Arc::new(MemoryStorage::new()));
        assert_eq!(repo.load_default_rate(), None);

        repo.save_default_rate(0.021).unwrap();
        assert_eq!(repo.load_default_rate(), Some(0.021));
    }

    #[test]
    fn test_unreadable_rate_is_none() {
        let storage = MemoryStorage::new();
        storage.put(DEFAULT_RATE_KEY, "fast").unwrap();
        let repo = SettingsRepository::new(Arc::new(storage));
        assert_eq!(repo.load_default_rate(), None);
    }
}
