use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::config::LunaConfig;

pub const DB_ENV: &str = "LUNA_PASS_DB";
pub const DB_FILE: &str = "luna-pass.db";
/// Database file name used by older releases.
pub const LEGACY_DB_FILE: &str = "astrobase.sql";

pub fn data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("luna-pass"))
        .context("could not determine the user data directory")
}

/// Pick the database file: `--db`, then `LUNA_PASS_DB`, then the config
/// file, then `<data dir>/luna-pass/luna-pass.db`.
pub fn resolve_db_path(
    flag: Option<&Path>,
    env: Option<OsString>,
    config: &LunaConfig,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }
    default_db_path(&data_dir()?)
}

/// `<dir>/luna-pass.db`, creating `dir` and adopting a legacy file.
pub fn default_db_path(dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    adopt_legacy_file(dir)
        .with_context(|| format!("failed to rename legacy database in {}", dir.display()))?;
    Ok(dir.join(DB_FILE))
}

/// Rename `astrobase.sql` to `luna-pass.db` when only the former exists.
pub fn adopt_legacy_file(dir: &Path) -> io::Result<bool> {
    let current = dir.join(DB_FILE);
    let legacy = dir.join(LEGACY_DB_FILE);
    if current.exists() || !legacy.exists() {
        return Ok(false);
    }
    fs::rename(&legacy, &current)?;
    info!(from = %legacy.display(), to = %current.display(), "renamed legacy database");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins() {
        let config = LunaConfig {
            db_path: Some("/from/config.db".into()),
            ..Default::default()
        };
        let path = resolve_db_path(
            Some(Path::new("/from/flag.db")),
            Some("/from/env.db".into()),
            &config,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/from/flag.db"));
    }

    #[test]
    fn env_beats_config() {
        let config = LunaConfig {
            db_path: Some("/from/config.db".into()),
            ..Default::default()
        };
        let path = resolve_db_path(None, Some("/from/env.db".into()), &config).unwrap();
        assert_eq!(path, PathBuf::from("/from/env.db"));
    }

    #[test]
    fn empty_env_falls_through_to_config() {
        let config = LunaConfig {
            db_path: Some("/from/config.db".into()),
            ..Default::default()
        };
        let path = resolve_db_path(None, Some(OsString::new()), &config).unwrap();
        assert_eq!(path, PathBuf::from("/from/config.db"));
    }

    #[test]
    fn legacy_file_is_adopted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEGACY_DB_FILE), b"old").unwrap();

        let path = default_db_path(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(DB_FILE));
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert!(!dir.path().join(LEGACY_DB_FILE).exists());
    }

    #[test]
    fn existing_database_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEGACY_DB_FILE), b"old").unwrap();
        fs::write(dir.path().join(DB_FILE), b"new").unwrap();

        assert!(!adopt_legacy_file(dir.path()).unwrap());
        assert_eq!(fs::read(dir.path().join(DB_FILE)).unwrap(), b"new");
        assert!(dir.path().join(LEGACY_DB_FILE).exists());
    }

    #[test]
    fn default_path_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("luna-pass");
        let path = default_db_path(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(path.file_name().unwrap(), DB_FILE);
    }
}
