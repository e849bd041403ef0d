use crate::app_lib::{ApiClient, AppConfig};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, SessionStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
    pub ephemeral: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: AppConfig, ephemeral: bool) -> Self {
        Self { config, ephemeral }
    }

    /// Session storage: the session file, or memory for `--ephemeral` runs.
    #[must_use]
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        if self.ephemeral {
            debug!("using in-memory session store");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FileStore::open(&self.config.store_path))
        }
    }

    /// API client bound to a fresh session store.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config, SessionStore::new(self.store()))
            .context("Could not create API client")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::app_lib::ConfigOverrides;
    use crate::storage::session::ACCESS_TOKEN_KEY;

    fn config(store: &std::path::Path) -> AppConfig {
        AppConfig::from_overrides(ConfigOverrides {
            store_path: Some(store.to_path_buf()),
            ..ConfigOverrides::default()
        })
        .unwrap()
    }

    #[test]
    fn test_file_store_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let globals = GlobalArgs::new(config(&path), false);

        globals.store().set(ACCESS_TOKEN_KEY, "t1");
        assert!(path.exists());
        assert_eq!(globals.store().get(ACCESS_TOKEN_KEY).as_deref(), Some("t1"));
    }

    #[test]
    fn test_ephemeral_store_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let globals = GlobalArgs::new(config(&path), true);

        globals.store().set(ACCESS_TOKEN_KEY, "t1");
        assert!(!path.exists());
        assert_eq!(globals.store().get(ACCESS_TOKEN_KEY), None);
    }

    #[test]
    fn test_api_client_uses_configured_base() {
        let dir = tempfile::tempdir().unwrap();
        let globals = GlobalArgs::new(config(&dir.path().join("s.json")), true);
        let api = globals.api_client().unwrap();
        assert_eq!(
            api.endpoint("/api/v1/auth/me"),
            "http://localhost:8080/api/v1/auth/me"
        );
    }
}
