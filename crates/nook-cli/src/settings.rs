//! Runtime configuration for the `nook` binary.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use nook_catalog::{ClientConfig, google::DEFAULT_BASE_URL, queries::default_categories};
use serde::Deserialize;

/// Settings read from the optional TOML file, then from `NOOK_*`
/// environment variables. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path:           PathBuf,
  pub api_base_url:         String,
  pub api_key:              Option<String>,
  pub request_timeout_secs: u64,
  /// Home-screen categories, in display order.
  pub categories:           Vec<String>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:           PathBuf::from("~/.local/share/nook/library.sqlite3"),
      api_base_url:         DEFAULT_BASE_URL.to_owned(),
      api_key:              None,
      request_timeout_secs: 30,
      categories:           default_categories(),
    }
  }
}

impl Settings {
  /// Load from `path` (missing is fine) layered under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("NOOK"))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = raw.try_deserialize().context("failed to deserialise Settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }

  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      base_url: self.api_base_url.clone(),
      api_key:  self.api_key.clone().filter(|k| !k.is_empty()),
      timeout:  Duration::from_secs(self.request_timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
