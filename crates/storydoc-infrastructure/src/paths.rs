//! Path management for StoryDoc configuration files.
//!
//! ```text
//! ~/.config/storydoc/
//! └── config.toml      # service URL, timeout, log level
//! ```

use std::path::PathBuf;

use storydoc_core::{Result, StorydocError};

const APP_DIR: &str = "storydoc";
const CONFIG_FILE: &str = "config.toml";

pub struct StorydocPaths;

impl StorydocPaths {
    /// Returns the configuration directory (e.g. `~/.config/storydoc/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| StorydocError::config("Cannot find configuration directory"))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
