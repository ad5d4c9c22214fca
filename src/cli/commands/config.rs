//! Config Command
//!
//! Manage venue-assist configuration.
//!
//! Usage:
//!   venue-assist config show [-f json|toml]
//!   venue-assist config path
//!   venue-assist config init [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{AssistError, Result};

/// Show the merged effective configuration
pub fn show(config_path: Option<&Path>, format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" | "text" => false,
        other => {
            return Err(AssistError::Config(format!(
                "Unknown format '{}'. Valid values: json, toml",
                other
            )));
        }
    };

    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    println!("{}", ConfigLoader::render(&config, as_json)?);
    Ok(())
}

/// Show configuration file paths
pub fn path() -> Result<()> {
    let output = Output::new();
    output.header("Configuration files");

    match ConfigLoader::global_config_path() {
        Some(global) => println!("  Global:  {} {}", global.display(), exists_marker(&global)),
        None => println!("  Global:  (no config directory on this platform)"),
    }
    let project = ConfigLoader::project_config_path();
    println!("  Project: {} {}", project.display(), exists_marker(&project));
    println!("  Env:     VENUE_ASSIST_<SECTION>__<KEY>, GEMINI_API_KEY");
    Ok(())
}

/// Initialize project configuration
pub fn init(force: bool) -> Result<()> {
    let path = ConfigLoader::init_project(force)?;
    Output::new().success(&format!("Project configuration at {}", path.display()));
    Ok(())
}

fn exists_marker(path: &Path) -> &'static str {
    if path.exists() { "(found)" } else { "(missing)" }
}
