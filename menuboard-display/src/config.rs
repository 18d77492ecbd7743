//! Display configuration (`menuboard.toml`).
//!
//! Every key is optional. A missing file means all defaults.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use menuboard_core::{LayoutConfig, Rect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Points at a config file, overriding the per-user location.
pub const CONFIG_ENV: &str = "MENUBOARD_CONFIG";

/// Overrides `api_base` from the file.
pub const API_BASE_ENV: &str = "MENUBOARD_API_BASE";

const CONFIG_FILE: &str = "menuboard.toml";
const STATE_FILE: &str = "menuboard.db";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Base URL of the sheet API.
    pub api_base: String,

    /// Where the device identity is persisted.
    pub state_path: Option<PathBuf>,

    /// Seconds between fallback revalidations. 0 disables them.
    pub refresh_interval_secs: u64,

    pub layout: LayoutConfig,

    /// Viewport assumed until the surface reports one.
    pub viewport: ViewportConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000".to_string(),
            state_path: None,
            refresh_interval_secs: 0,
            layout: LayoutConfig::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl ViewportConfig {
    pub fn rect(&self) -> Rect {
        Rect::sized(self.width, self.height)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Menuboard", "menuboard")
}

impl DisplayConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid display config")
    }

    /// Read `path`. A file that does not exist yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text)
    }

    /// `$MENUBOARD_CONFIG`, else `<config dir>/menuboard.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(std::env::var(API_BASE_ENV).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, api_base: Option<String>) {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            self.api_base = base;
        }
    }

    /// Configured path, else `<data dir>/menuboard.db`, else the working
    /// directory.
    pub fn state_path(&self) -> PathBuf {
        if let Some(path) = &self.state_path {
            return path.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(STATE_FILE))
            .unwrap_or_else(|| PathBuf::from(STATE_FILE))
    }
}
