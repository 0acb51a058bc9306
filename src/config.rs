use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::fixture::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Where transactions come from
  pub source: SourceConfig,
  /// Custom title for the header (defaults to "spendview")
  pub title: Option<String>,
  /// UI refresh interval in milliseconds
  pub tick_rate_ms: u64,
  pub log: LogConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      source: SourceConfig::default(),
      title: None,
      tick_rate_ms: 250,
      log: LogConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
  /// JSON dataset served from memory. Without a path the bundled demo data is used.
  Fixture {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default = "default_page_size")]
    page_size: usize,
    /// Artificial delay per request, to see loading states
    #[serde(default)]
    latency_ms: u64,
  },
  /// Remote transactions API
  Http {
    url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
  },
}

impl Default for SourceConfig {
  fn default() -> Self {
    SourceConfig::Fixture {
      path: None,
      page_size: default_page_size(),
      latency_ms: 0,
    }
  }
}

fn default_page_size() -> usize {
  DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
  30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Filter directive, overridden by SPENDVIEW_LOG
  pub level: String,
  /// Log directory (default: $XDG_DATA_HOME/spendview/logs)
  pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      dir: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./spendview.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/spendview/config.yaml
  ///
  /// Falls back to defaults (bundled demo data) when no file exists.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("spendview.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("spendview").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    if let SourceConfig::Fixture { page_size: 0, .. } = config.source {
      return Err(eyre!("page_size must be at least 1"));
    }
    Ok(config)
  }

  /// Bearer token for the HTTP source, from SPENDVIEW_API_TOKEN.
  pub fn get_api_token() -> Option<String> {
    std::env::var("SPENDVIEW_API_TOKEN")
      .ok()
      .filter(|token| !token.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = Config::parse("{}").unwrap();
    assert_eq!(config.source, SourceConfig::default());
    assert_eq!(config.tick_rate_ms, 250);
    assert_eq!(config.log.level, "info");
  }

  #[test]
  fn test_fixture_source() {
    let config = Config::parse(
      "source:\n  kind: fixture\n  path: data.json\n  page_size: 10\n  latency_ms: 300\n",
    )
    .unwrap();
    assert_eq!(
      config.source,
      SourceConfig::Fixture {
        path: Some(PathBuf::from("data.json")),
        page_size: 10,
        latency_ms: 300,
      }
    );
  }

  #[test]
  fn test_http_source_with_default_timeout() {
    let config = Config::parse(
      "title: Card spend\nsource:\n  kind: http\n  url: https://api.example.com\nlog:\n  level: debug\n",
    )
    .unwrap();
    assert_eq!(
      config.source,
      SourceConfig::Http {
        url: "https://api.example.com".to_string(),
        timeout_secs: 30,
      }
    );
    assert_eq!(config.title.as_deref(), Some("Card spend"));
    assert_eq!(config.log.level, "debug");
  }

  #[test]
  fn test_zero_page_size_is_rejected() {
    assert!(Config::parse("source:\n  kind: fixture\n  page_size: 0\n").is_err());
  }

  #[test]
  fn test_unknown_source_kind_is_rejected() {
    assert!(Config::parse("source:\n  kind: ftp\n").is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_error() {
    assert!(Config::load(Some(Path::new("/nonexistent/spendview.yaml"))).is_err());
  }
}
