//! CLI Common Utilities
//!
//! Shared initialization for CLI commands.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::ai::{RetryPolicy, StructuredClient};
use crate::config::{Config, ConfigLoader};
use crate::types::Result;
use crate::venue::VenueCatalog;

/// Catalog used when `--catalog` is not given
pub const DEFAULT_CATALOG_PATH: &str = "venues.json";

/// Command execution context
///
/// Resolved configuration plus the generation client and retry policy
/// derived from it.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub client: StructuredClient,
    pub policy: RetryPolicy,
}

impl CommandContext {
    /// Load configuration (from `config_path` when given, otherwise the
    /// full resolution chain) and build the client
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        let client = StructuredClient::from_config(&config)?;
        let policy = RetryPolicy::from(&config.retry);

        Ok(Self {
            config,
            client,
            policy,
        })
    }

    /// Client variant whose exhaustion message is the summary fallback
    pub fn summary_client(&self) -> StructuredClient {
        self.client
            .clone()
            .with_fallback_message(self.config.messages.summary_fallback.clone())
    }
}

/// Load a venue catalog, shared between commands
pub fn load_catalog(path: &Path) -> Result<Arc<VenueCatalog>> {
    let catalog = VenueCatalog::load(path)?;
    if catalog.is_empty() {
        warn!(catalog = %path.display(), "Catalog has no venues");
    }
    Ok(Arc::new(catalog))
}
