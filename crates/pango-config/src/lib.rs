//! pangoffi configuration system
//!
//! This crate provides centralized configuration for the Pango bindings,
//! loading settings from `pangoffi.toml` with environment variables layered
//! on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file, looked up in the current directory.
pub const CONFIG_FILE: &str = "pangoffi.toml";

/// Environment variable naming an alternate configuration file.
pub const CONFIG_PATH_VAR: &str = "PANGOFFI_CONFIG";

/// Environment variable toggling the linked binding mode.
pub const API_MODE_VAR: &str = "PANGOFFI_API_MODE";

/// Logical names of the three native libraries, in load order.
pub const LIBRARY_NAMES: [&str; 3] = ["pango", "gobject", "glib"];

/// Errors raised while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration structure for the bindings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BindingConfig {
    /// Binding mode selection
    pub binding: BindingSettings,
    /// Extra directories searched for shared libraries
    pub search: SearchConfig,
    /// Per-library overrides
    pub libraries: LibrariesConfig,
}

/// Binding mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingSettings {
    /// Try the build-time linked binding before runtime resolution (default: true)
    pub api_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    /// Directories scanned before the platform defaults
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LibrariesConfig {
    pub pango: LibraryConfig,
    pub gobject: LibraryConfig,
    pub glib: LibraryConfig,
}

/// Settings for one native library
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LibraryConfig {
    /// Exact path or loader name tried before any candidate search
    pub location: Option<PathBuf>,
    /// Candidate names tried ahead of the built-in list
    pub names: Vec<String>,
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self { api_mode: true }
    }
}

impl LibrariesConfig {
    /// Look up the settings for a logical library name.
    pub fn get(&self, name: &str) -> Option<&LibraryConfig> {
        match name {
            "pango" => Some(&self.pango),
            "gobject" => Some(&self.gobject),
            "glib" => Some(&self.glib),
            _ => None,
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut LibraryConfig> {
        match name {
            "pango" => Some(&mut self.pango),
            "gobject" => Some(&mut self.gobject),
            "glib" => Some(&mut self.glib),
            _ => None,
        }
    }
}

/// Name of the location override variable for a logical library,
/// e.g. `GLIB_LOCATION` for `glib`.
pub fn location_var(library: &str) -> String {
    format!("{}_LOCATION", library.to_uppercase())
}

/// Whether an environment value switches a feature off.
pub fn is_falsy(value: &str) -> bool {
    let value = value.trim();
    value == "0"
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("off")
}

impl BindingConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path of the configuration file: `PANGOFFI_CONFIG` if set, otherwise
    /// `pangoffi.toml` in the current directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Load configuration from the default location, or return the default
    /// configuration if the file doesn't exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        log::debug!("loading config from {}", path.display());
        Self::load_from_file(path)
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(API_MODE_VAR).filter(|v| !v.is_empty()) {
            self.binding.api_mode = !is_falsy(&val);
        }

        for name in LIBRARY_NAMES {
            if let Some(location) = lookup(&location_var(name)).filter(|v| !v.is_empty()) {
                if let Some(lib) = self.libraries.get_mut(name) {
                    lib.location = Some(PathBuf::from(location));
                }
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from `pangoffi.toml` (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Result<Self> {
        let mut config = Self::load_or_default()?;
        config.merge_with_env();
        Ok(config)
    }
}
