use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

pub const CONFIG_FILE: &str = "taskmate.toml";

/// Commented template written by `taskmate init`
pub const CONFIG_TEMPLATE: &str = include_str!("../templates/taskmate.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read taskmate.toml from the data directory. A missing file yields the
/// default configuration.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no {} in {}, using defaults", CONFIG_FILE, data_dir.display());
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
}

/// Write the config template. Returns false (and leaves the file alone) when
/// one already exists and `force` is not set.
pub fn write_config_template(data_dir: &Path, force: bool) -> Result<bool, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if path.exists() && !force {
        return Ok(false);
    }
    fs::create_dir_all(data_dir)
        .and_then(|()| fs::write(&path, CONFIG_TEMPLATE))
        .map_err(|source| ConfigError::Write { path, source })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.timer.minutes, 25);
    }

    #[test]
    fn template_parses_to_defaults() {
        let tmp = TempDir::new().unwrap();
        assert!(write_config_template(tmp.path(), false).unwrap());
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.timer.minutes, 25);
        assert_eq!(config.timer.presets, vec![15, 25, 50]);
        assert!(!config.notify.desktop);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn template_not_overwritten_without_force() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[timer]\nminutes = 5\n").unwrap();
        assert!(!write_config_template(tmp.path(), false).unwrap());
        assert_eq!(read_config(tmp.path()).unwrap().timer.minutes, 5);

        assert!(write_config_template(tmp.path(), true).unwrap());
        assert_eq!(read_config(tmp.path()).unwrap().timer.minutes, 25);
    }

    #[test]
    fn invalid_config_reports_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[timer]\nminutes = \"soon\"\n").unwrap();
        let err = read_config(tmp.path()).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
