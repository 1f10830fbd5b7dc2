use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// User configuration, read from `<config dir>/luna-pass/config.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LunaConfig {
    /// Database file, overridden by `--db` and `LUNA_PASS_DB`.
    pub db_path: Option<PathBuf>,
    /// Editor for `note`, in place of `$EDITOR`.
    pub editor: Option<String>,
    /// Default log filter when neither `--verbose` nor `RUST_LOG` is given.
    pub log_level: Option<String>,
}

impl LunaConfig {
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("luna-pass").join("config.toml"))
    }

    pub fn load() -> anyhow::Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// The editor command line for `note`.
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vim".to_string())
    }
}
