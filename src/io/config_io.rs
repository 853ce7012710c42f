use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::config::{ConfigFile, Settings};

/// Overrides the config file location
pub const CONFIG_ENV: &str = "TASKER_CONFIG";
/// Overrides the store file location from the config file
pub const STORE_FILE_ENV: &str = "TASKER_FILE";

/// Error type for reading the config file
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
}

/// Get the config file path: `$TASKER_CONFIG`, else
/// `$XDG_CONFIG_HOME/tasker/config.toml`, else `~/.config/tasker/config.toml`
pub fn config_path() -> PathBuf {
    if let Some(path) = env_path(CONFIG_ENV) {
        return path;
    }
    let config_dir = env_path("XDG_CONFIG_HOME").unwrap_or_else(|| dirs_home().join(".config"));
    config_dir.join("tasker").join("config.toml")
}

fn dirs_home() -> PathBuf {
    env_path("HOME").unwrap_or_else(|| PathBuf::from("/"))
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Read a config file. A missing file yields the defaults.
pub fn read_config_from(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ConfigFile::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Combine the layers: config file, then `TASKER_FILE`, then `--file`.
pub fn resolve_settings(
    config: ConfigFile,
    env_file: Option<PathBuf>,
    flag_file: Option<PathBuf>,
) -> Settings {
    let defaults = Settings::default();
    let store_path = flag_file
        .or(env_file)
        .or(config.store_path)
        .unwrap_or(defaults.store_path);
    Settings {
        store_path,
        rules: config.rules,
    }
}

/// Resolve the settings for this process
pub fn load_settings(flag_file: Option<PathBuf>) -> Result<Settings, ConfigError> {
    let config = read_config_from(&config_path())?;
    let settings = resolve_settings(config, env_path(STORE_FILE_ENV), flag_file);
    debug!(
        store = %settings.store_path.display(),
        min_description_length = settings.rules.min_description_length,
        "resolved settings"
    );
    Ok(settings)
}
