// Configuration loading.
// The config lives at `$XDG_CONFIG_HOME/up/config.toml` (falling back to
// `~/.config/up/config.toml`) and must name three things: the public base
// URL, the destination directory on the remote host and the rsync target
// host. Values are not checked beyond presence; a bad URL or host shows up
// later as a transfer error or a wrong link.

use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "up";
const CONFIG_FILE: &str = "config.toml";

/// Failures that stop a run before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at '{}'", .path.display())]
    NotFound { path: PathBuf },

    #[error("cannot locate the home directory to find the config file")]
    NoHomeDirectory,

    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("key missing in config: '{key}'")]
    MissingKey { key: &'static str },

    #[error("key is empty in config: '{key}'")]
    EmptyKey { key: &'static str },
}

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    dest_dir: String,
    target_host: String,
}

/// Shape of the TOML file before validation. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    pub base_url: Option<String>,
    pub dest_dir: Option<String>,
    pub target_host: Option<String>,
}

impl Config {
    /// Validate a parsed file. Keys are checked in a fixed order and the
    /// first absent or empty one is reported.
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let base_url = required("base_url", raw.base_url.map(trim_trailing_slashes))?;
        let dest_dir = required("dest_dir", raw.dest_dir)?;
        let target_host = required("target_host", raw.target_host)?;
        Ok(Self {
            base_url,
            dest_dir,
            target_host,
        })
    }

    /// Parse TOML text. `path` is only used in error messages.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_raw(raw)
    }

    /// Public URL prefix, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload root on the remote host.
    pub fn dest_dir(&self) -> &str {
        &self.dest_dir
    }

    /// Host spec passed to rsync, e.g. `user@example.com`.
    pub fn target_host(&self) -> &str {
        &self.target_host
    }
}

fn required(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        None => Err(ConfigError::MissingKey { key }),
        Some(value) if value.is_empty() => Err(ConfigError::EmptyKey { key }),
        Some(value) => Ok(value),
    }
}

fn trim_trailing_slashes(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Where the config file is expected, based on the current environment.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    config_path_from(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
}

/// Resolve the config path from an `XDG_CONFIG_HOME` value and a home
/// directory. An empty `XDG_CONFIG_HOME` counts as unset.
pub fn config_path_from(
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    let config_home = match xdg_config_home.filter(|value| !value.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home.ok_or(ConfigError::NoHomeDirectory)?.join(".config"),
    };
    Ok(config_home.join(APP_DIR).join(CONFIG_FILE))
}

/// Read and validate the config file at `path`.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::from_toml(&text, path)?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// Resolve the config path and load it.
pub fn load_default() -> Result<Config, ConfigError> {
    load(&config_path()?)
}
