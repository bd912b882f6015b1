//! Application settings: `~/.config/gamezone/settings.toml` plus environment
//! overrides.
//!
//! Every field has a default, so a missing file is not an error. Priority is
//! CLI flag > environment > file > default; CLI flags are applied by the
//! caller after [`Settings::load`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use gamezone_core::Placeholders;

use crate::error::SettingsError;
use crate::retry::{Backoff, RetryPolicy};

/// Worker count when neither `JOBS` nor the config file set one.
pub const DEFAULT_JOBS: usize = 10;

/// Canonical path to the settings file: `~/.config/gamezone/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("gamezone").join("settings.toml")
}

fn default_asset_checkout() -> PathBuf {
    let cache = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    cache.join("gamezone").join("assets")
}

/// Remote endpoints for the catalogue, statistics and content hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// CDN base for the catalogue repository; `@<revision>/zones.json` is appended
    pub catalogue_cdn: String,
    /// Revision aliases tried after the discovered revision
    pub catalogue_aliases: Vec<String>,
    /// Source-repository API base; `/commits` is appended
    pub revision_api: String,
    /// Raw-file base holding `sha.txt`
    pub revision_raw: String,
    /// Statistics base; `/files?period=...` is appended
    pub stats_base: String,
    pub html_base: String,
    pub cover_base: String,
    /// Page used to build shareable `?id=` links
    pub page_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            catalogue_cdn: "https://cdn.jsdelivr.net/gh/gn-math/assets".into(),
            catalogue_aliases: vec!["latest".into(), "main".into()],
            revision_api: "https://api.github.com/repos/gn-math/assets".into(),
            revision_raw: "https://raw.githubusercontent.com/gn-math/assets/main".into(),
            stats_base: "https://data.jsdelivr.com/v1/stats/packages/gh/gn-math/html@main".into(),
            html_base: "https://cdn.jsdelivr.net/gh/gn-math/html@main".into(),
            cover_base: "https://cdn.jsdelivr.net/gh/gn-math/covers@main".into(),
            page_url: "https://gn-math.github.io/".into(),
        }
    }
}

impl Endpoints {
    pub fn placeholders(&self) -> Placeholders {
        Placeholders::new(&self.html_base, &self.cover_base)
    }
}

/// Bulk mirror downloader settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    /// Worker pool size
    pub jobs: usize,
    pub output_dir: PathBuf,
    /// Git URL of the asset repository
    pub asset_repo: String,
    pub asset_branch: String,
    /// Local sparse checkout of the asset repository
    pub asset_checkout: PathBuf,
    /// Directories to check out; empty means the whole tree
    pub sparse_paths: Vec<String>,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            output_dir: PathBuf::from("games"),
            asset_repo: "https://github.com/gn-math/assets.git".into(),
            asset_branch: "main".into(),
            asset_checkout: default_asset_checkout(),
            sparse_paths: Vec::new(),
        }
    }
}

/// Serialized form of [`RetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub delay_ms: u64,
    pub backoff: Backoff,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            delay_ms: policy.delay.as_millis() as u64,
            backoff: policy.backoff,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.delay_ms), self.backoff)
    }
}

/// Everything configurable, grouped as in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoints: Endpoints,
    pub mirror: MirrorSettings,
    pub retry: RetrySettings,
}

impl Settings {
    /// Load settings and apply environment overrides.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// used, and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(p) if !p.exists() => return Err(SettingsError::NotFound(p.to_path_buf())),
            Some(p) => Self::from_file(p)?,
            None => {
                let default = settings_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents).map_err(|message| SettingsError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    /// Apply `JOBS`, `GAMEZONE_OUTPUT`, `GAMEZONE_HTML_BASE` and
    /// `GAMEZONE_COVER_BASE` from `lookup`.
    ///
    /// An unparseable `JOBS` is ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(jobs) = lookup("JOBS") {
            match jobs.trim().parse::<usize>() {
                Ok(n) if n > 0 => self.mirror.jobs = n,
                _ => log::warn!("Ignoring invalid JOBS value '{}'", jobs),
            }
        }
        if let Some(dir) = lookup("GAMEZONE_OUTPUT").filter(|s| !s.is_empty()) {
            self.mirror.output_dir = PathBuf::from(dir);
        }
        if let Some(base) = lookup("GAMEZONE_HTML_BASE").filter(|s| !s.is_empty()) {
            self.endpoints.html_base = base;
        }
        if let Some(base) = lookup("GAMEZONE_COVER_BASE").filter(|s| !s.is_empty()) {
            self.endpoints.cover_base = base;
        }
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize(e.to_string()))
    }

    /// Write settings atomically, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = self.to_toml_string()?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
