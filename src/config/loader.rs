//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (e.g. ~/.config/venue-assist/config.toml)
//! 3. Project config (.venue-assist/config.toml)
//! 4. Environment variables (VENUE_ASSIST_* prefix, `__` between sections)

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{AssistError, Result};

const ENV_PREFIX: &str = "VENUE_ASSIST_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        Self::extract(figment.merge(Self::env()))
    }

    /// Load configuration from a specific file (plus env overrides)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Self::env());
        Self::extract(figment)
    }

    // VENUE_ASSIST_RETRY__BASE_DELAY_MS -> retry.base_delay_ms
    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__").lowercase(true)
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| AssistError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory (platform config dir / venue-assist)
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "venue-assist").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(".venue-assist")
    }

    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration as JSON or TOML
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| AssistError::Config(e.to_string()))
        }
    }

    /// Write a default project config; existing files are kept unless `force`
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::init_at(&Self::project_dir(), force)
    }

    fn init_at(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config_toml())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    fn default_config_toml() -> &'static str {
        r#"# venue-assist configuration
# Environment variables override these, e.g. VENUE_ASSIST_LLM__MODEL.
# The API key is read from GEMINI_API_KEY unless llm.api_key is set.

version = "1.0"

[llm]
model = "gemini-2.5-flash-preview-09-2025"
api_base = "https://generativelanguage.googleapis.com/v1beta"
timeout_secs = 30

[retry]
max_attempts = 3
base_delay_ms = 1000
jitter_max_ms = 1000
"#
    }
}
