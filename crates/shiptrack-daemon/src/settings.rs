//! Daemon settings: a TOML file overlaid by `SHIPTRACK_*` variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;
use shiptrack_aprs::{AprsConfig, DEFAULT_API_URL, DEFAULT_USER_AGENT};
use shiptrack_core::store::DEFAULT_RETENTION_CAP;
use shiptrack_ingest::IngestConfig;
use thiserror::Error;

/// Every problem found by [`DaemonConfig::validate`], reported together.
#[derive(Debug, Error)]
#[error("invalid configuration: {}", .0.join("; "))]
pub struct InvalidConfig(pub Vec<String>);

#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
  #[serde(default)]
  pub api_key:       String,
  #[serde(default = "default_api_url")]
  pub api_url:       String,
  #[serde(default = "default_user_agent")]
  pub user_agent:    String,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  #[serde(default = "default_tick_ms")]
  pub tick_ms:       u64,
  #[serde(default = "default_cycle_ticks")]
  pub cycle_ticks:   u32,
  #[serde(default = "default_max_batch")]
  pub max_batch:     usize,
  #[serde(default = "default_retention_cap")]
  pub retention_cap: usize,
}

fn default_api_url() -> String { DEFAULT_API_URL.to_string() }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.to_string() }
fn default_store_path() -> PathBuf { PathBuf::from("shiptrack.db") }
fn default_tick_ms() -> u64 { 1000 }
fn default_cycle_ticks() -> u32 { 7200 }
fn default_max_batch() -> usize { 20 }
fn default_retention_cap() -> usize { DEFAULT_RETENTION_CAP }

impl DaemonConfig {
  /// Read `path` (optional) and the `SHIPTRACK_*` environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SHIPTRACK").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  /// Check the settings. The API key is only needed by commands that call
  /// the tracking service.
  pub fn validate(&self, require_api: bool) -> Result<(), InvalidConfig> {
    let mut problems = Vec::new();

    if require_api && self.api_key.trim().is_empty() {
      problems.push("api_key must be set".to_string());
    }
    if require_api && self.api_url.trim().is_empty() {
      problems.push("api_url must not be empty".to_string());
    }
    if self.store_path.as_os_str().is_empty() {
      problems.push("store_path must not be empty".to_string());
    }
    if self.tick_ms == 0 {
      problems.push("tick_ms must be greater than 0".to_string());
    }
    if self.cycle_ticks == 0 {
      problems.push("cycle_ticks must be at least 1".to_string());
    }
    if self.max_batch == 0 {
      problems.push("max_batch must be at least 1".to_string());
    }
    if self.retention_cap == 0 {
      problems.push("retention_cap must be at least 1".to_string());
    }

    if problems.is_empty() { Ok(()) } else { Err(InvalidConfig(problems)) }
  }

  pub fn aprs(&self) -> AprsConfig {
    AprsConfig {
      api_url:    self.api_url.clone(),
      api_key:    self.api_key.clone(),
      user_agent: self.user_agent.clone(),
    }
  }

  pub fn ingest(&self) -> IngestConfig {
    IngestConfig {
      tick:          Duration::from_millis(self.tick_ms),
      cycle_ticks:   self.cycle_ticks,
      max_batch:     self.max_batch,
      retention_cap: self.retention_cap,
    }
  }

  /// `store_path` with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  /// [`store_path`](Self::store_path), after creating its parent directory.
  pub fn prepare_store_path(&self) -> std::io::Result<PathBuf> {
    let path = self.store_path();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    Ok(path)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
