//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/nestedset/nestedset.toml`
//! 3. Environment variables: `NESTEDSET_*` prefix
//!
//! The CLI `--store` flag is applied on top by the caller.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for nestedset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Row store snapshot file (default: `<data_dir>/tree.toml`)
    pub store_path: PathBuf,
    /// Reject fetched rows with `left >= right`
    pub verify_reads: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            verify_reads: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub store_path: Option<PathBuf>,
    pub verify_reads: Option<bool>,
}

fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "nestedset")
        .map(|dirs| dirs.data_dir().join("tree.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.nestedset/tree.toml"))
}

/// Get the XDG config directory for nestedset.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nestedset").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("nestedset.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is returned as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load defaults, then the global config file, then `NESTEDSET_*` overrides.
    pub fn load() -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref())
    }

    /// Same as [`Settings::load`] with an explicit config file.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            store_path: overlay
                .store_path
                .clone()
                .unwrap_or_else(|| self.store_path.clone()),
            verify_reads: overlay.verify_reads.unwrap_or(self.verify_reads),
        }
    }

    /// Apply NESTEDSET_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("NESTEDSET").try_parsing(true))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("store_path") {
            settings.store_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("verify_reads") {
            settings.verify_reads = val;
        }
        Ok(settings)
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.store_path.to_string_lossy().as_ref());
        self.store_path = PathBuf::from(expanded);
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# nestedset configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/nestedset/nestedset.toml
#   Env:    NESTEDSET_* environment variables
#   CLI:    --store <path>

# Row store snapshot file
# store_path = "~/.local/share/nestedset/tree.toml"

# Reject rows with left >= right when reading
# verify_reads = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
