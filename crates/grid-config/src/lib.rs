//! Configuration loading and parsing for the grid demo.
//!
//! Parses `cellgrid.toml`, extracting the `[edit]` table. Unknown fields are
//! ignored (TOML deserialization tolerance) so the file format can evolve
//! without breaking older binaries, and a malformed file falls back to
//! defaults rather than refusing to start; the grid is fully usable with no
//! configuration at all.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize, Clone)]
pub struct EditConfig {
    /// Whether a Delete keystroke on an idle cell routes through the commit
    /// path and fires the change callback. `false` restores the legacy
    /// behavior of a silent raw clear that the callback never observes.
    #[serde(default = "EditConfig::default_delete_notifies")]
    pub delete_notifies: bool,
    /// Whether every key except the composition-advancing Process key is
    /// intercepted while a composition is active. Works around IMEs that
    /// leak cursor keys mid-conversion; `false` trusts the host's IME.
    #[serde(default = "EditConfig::default_guard_composition_keys")]
    pub guard_composition_keys: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            delete_notifies: Self::default_delete_notifies(),
            guard_composition_keys: Self::default_guard_composition_keys(),
        }
    }
}

impl EditConfig {
    const fn default_delete_notifies() -> bool {
        true
    }
    const fn default_guard_composition_keys() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub edit: EditConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path following platform conventions: prefer a local
/// `cellgrid.toml` in the working directory before the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("cellgrid.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("cellgrid").join("cellgrid.toml");
    }
    PathBuf::from("cellgrid.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Ok(Config {
                raw: Some(content),
                file,
            }),
            Err(e) => {
                warn!(
                    target: "config",
                    path = %path.display(),
                    error = %e,
                    "config_parse_failed_using_defaults"
                );
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}
