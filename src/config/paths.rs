//! Where parley keeps its files.
//!
//! `settings.toml` lives in the platform config dir. The record database and
//! everything the front-end exports live under the platform local-data dir.
//! Both fall back to `./parley` when the platform has no such directory.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "parley";

fn under_app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}

/// Default locations of parley's settings, database and exports.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    pub data_dir: PathBuf,
    /// SQLite file holding mistakes and verdicts.
    pub records_db: PathBuf,
    /// PDFs and spoken replies.
    pub exports_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        Self::rooted(
            &under_app_dir(dirs::config_dir()),
            &under_app_dir(dirs::data_local_dir()),
        )
    }

    /// Lay out every file below the two given directories.
    pub fn rooted(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            settings_file: config_dir.join("settings.toml"),
            data_dir: data_dir.to_path_buf(),
            records_db: data_dir.join("records.db"),
            exports_dir: data_dir.join("exports"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.data_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths
            .records_db
            .file_name()
            .is_some_and(|n| n == "records.db"));
    }

    #[test]
    fn rooted_layout_uses_given_directories() {
        let paths = AppPaths::rooted(Path::new("/tmp/cfg"), Path::new("/tmp/data"));
        assert_eq!(paths.settings_file, Path::new("/tmp/cfg/settings.toml"));
        assert_eq!(paths.records_db, Path::new("/tmp/data/records.db"));
        assert_eq!(paths.exports_dir, Path::new("/tmp/data/exports"));
    }

    #[test]
    fn fallback_dir_is_relative_app_dir() {
        assert_eq!(under_app_dir(None), PathBuf::from("./parley"));
    }

    #[test]
    fn records_and_exports_live_under_data_dir() {
        let paths = AppPaths::new();
        assert!(paths.records_db.starts_with(&paths.data_dir));
        assert!(paths.exports_dir.starts_with(&paths.data_dir));
    }
}
