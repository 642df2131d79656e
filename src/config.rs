//! Optional user configuration at `~/.revtrack/config.json`
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! A file that exists but does not parse is an error.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::services::dates::DEFAULT_DATE_PATTERN;
use crate::types::{Result, RevtrackError};

/// Terminal theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Day label pattern (date-fns tokens)
    pub date_pattern: String,
    pub theme: ThemeChoice,
    /// Used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            theme: ThemeChoice::Auto,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// `~/.revtrack/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| RevtrackError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".revtrack").join("config.json"))
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RevtrackError::Config(format!("{}: {}", path.display(), e)))
    }
}
