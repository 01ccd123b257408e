//! Configuration file discovery for the CLI.

use crate::error::Result;
use formlink_watcher::WatcherConfig;
use std::path::{Path, PathBuf};

/// Default configuration location, `~/.formlink/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".formlink").join("config.toml"))
}

/// Load configuration for a command.
///
/// Reads `explicit` when given, otherwise the default file if it exists,
/// otherwise starts from defaults. Environment overrides are applied last;
/// `dry_run` from the command line can only switch dry-run on.
pub fn load(explicit: Option<&Path>, dry_run: bool) -> Result<WatcherConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| default_path().filter(|p| p.exists()));
    let mut config = load_from(path.as_deref())?;
    config.apply_env()?;
    config.dry_run |= dry_run;
    Ok(config)
}

fn load_from(path: Option<&Path>) -> Result<WatcherConfig> {
    match path {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            Ok(WatcherConfig::from_file(path)?)
        }
        None => Ok(WatcherConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use formlink_watcher::ConfigError;
    use std::fs;

    #[test]
    fn test_default_path_is_under_home() {
        if let Some(path) = default_path() {
            assert!(path.ends_with(".formlink/config.toml"));
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "poll_interval_secs = 15\n\n[asana]\naccess_token = \"tok\"\nproject_id = \"900\"\n",
        )
        .unwrap();

        let config = load_from(Some(&path)).unwrap();
        assert_eq!(config.poll_interval_secs, 15);
        assert_eq!(config.asana.project_id.as_deref(), Some("900"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(ConfigError::FileRead(_)))));
    }

    #[test]
    fn test_no_file_gives_defaults() {
        let config = load_from(None).unwrap();
        assert_eq!(config.poll_interval_secs, 60);
    }

    #[test]
    fn test_dry_run_flag_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "dry_run = false\n").unwrap();

        let config = load(Some(&path), true).unwrap();
        assert!(config.dry_run);
    }
}
