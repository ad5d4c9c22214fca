pub mod commands;
pub mod ui;
pub mod util;

pub use util::{CommandContext, DEFAULT_CATALOG_PATH, load_catalog};
