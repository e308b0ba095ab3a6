//! Configuration file support for autocpp.
//!
//! autocpp supports two configuration file locations:
//! - Global: `~/.autocpp/config.toml` - User-wide defaults
//! - Project: `.autocpp/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! (and their environment variables) take precedence over both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::discovery::LookupMethod;

/// Probe timeout used when none is configured.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 10_000;

/// Default editor configuration directory, relative to the workspace.
pub const DEFAULT_EDITOR_DIR: &str = ".vscode";

/// autocpp configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain discovery settings
    pub discovery: DiscoveryConfig,

    /// Editor configuration settings
    pub editor: EditorConfig,
}

/// Toolchain discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// How executables are looked up (command, path)
    pub lookup: Option<LookupMethod>,

    /// Per-probe timeout in milliseconds (0 disables the timeout)
    pub probe_timeout_ms: Option<u64>,

    /// Directory of the bundled fallback toolchain
    pub embedded_dir: Option<PathBuf>,
}

impl DiscoveryConfig {
    pub fn lookup_method(&self) -> LookupMethod {
        self.lookup.unwrap_or_default()
    }

    /// Effective per-probe timeout.
    pub fn probe_timeout(&self) -> Option<Duration> {
        match self.probe_timeout_ms.unwrap_or(DEFAULT_PROBE_TIMEOUT_MS) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

/// Editor configuration settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory that receives tasks.json and launch.json
    pub config_dir: Option<String>,

    /// Extra flags passed to the compiler on every build
    pub cflags: Vec<String>,
}

impl EditorConfig {
    pub fn config_dir(&self) -> &str {
        self.config_dir.as_deref().unwrap_or(DEFAULT_EDITOR_DIR)
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Discovery settings
        if other.discovery.lookup.is_some() {
            self.discovery.lookup = other.discovery.lookup;
        }
        if other.discovery.probe_timeout_ms.is_some() {
            self.discovery.probe_timeout_ms = other.discovery.probe_timeout_ms;
        }
        if other.discovery.embedded_dir.is_some() {
            self.discovery.embedded_dir = other.discovery.embedded_dir;
        }

        // Editor settings
        if other.editor.config_dir.is_some() {
            self.editor.config_dir = other.editor.config_dir;
        }
        if !other.editor.cflags.is_empty() {
            self.editor.cflags = other.editor.cflags;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.autocpp/config.toml)
/// 2. Global config (~/.autocpp/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Load merged configuration for a project rooted at `project_root`.
pub fn load_config_for(project_root: &Path) -> Config {
    let project_path = project_config_path(project_root);
    match global_config_path() {
        Some(global) => load_config(&global, &project_path),
        None => load_config(&PathBuf::new(), &project_path),
    }
}

/// Get the global autocpp config directory (~/.autocpp).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".autocpp"))
}

/// Get the global config path (~/.autocpp/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.autocpp/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".autocpp").join("config.toml")
}
