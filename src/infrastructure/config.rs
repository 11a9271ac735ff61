use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::domain::invoice::{DEFAULT_HISTORY_KEY, DEFAULT_LOGO_MAX_BYTES};

fn default_data_dir() -> PathBuf {
  PathBuf::from("./data")
}

fn default_history_key() -> String {
  DEFAULT_HISTORY_KEY.to_string()
}

fn default_page_size() -> String {
  "A4".to_string()
}

fn default_logo_max_bytes() -> usize {
  DEFAULT_LOGO_MAX_BYTES
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  #[serde(default)]
  pub storage: StorageConfig,
  #[serde(default)]
  pub pdf: PdfConfig,
  #[serde(default)]
  pub logo: LogoConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
  /// One JSON file per key under `data_dir`
  #[default]
  File,
  /// Process memory only; history is lost on restart
  Memory,
}

/// Local storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
  #[serde(default)]
  pub backend: StorageBackend,
  #[serde(default = "default_data_dir")]
  pub data_dir: PathBuf,
  #[serde(default = "default_history_key")]
  pub history_key: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      backend: StorageBackend::default(),
      data_dir: default_data_dir(),
      history_key: default_history_key(),
    }
  }
}

/// PDF generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
  pub wkhtmltopdf_path: Option<String>,
  #[serde(default = "default_page_size")]
  pub page_size: String,
}

impl Default for PdfConfig {
  fn default() -> Self {
    Self {
      wkhtmltopdf_path: None,
      page_size: default_page_size(),
    }
  }
}

/// Logo upload limits
#[derive(Debug, Clone, Deserialize)]
pub struct LogoConfig {
  #[serde(default = "default_logo_max_bytes")]
  pub max_bytes: usize,
}

impl Default for LogoConfig {
  fn default() -> Self {
    Self {
      max_bytes: default_logo_max_bytes(),
    }
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with INVOICER_ prefix
  ///
  /// # Environment Variables
  ///
  /// Environment variables use the INVOICER_ prefix and are separated by double underscores:
  /// - `INVOICER_SERVER__PORT=8080`
  /// - `INVOICER_STORAGE__BACKEND=memory`
  /// - `INVOICER_STORAGE__DATA_DIR=/var/lib/invoicer`
  /// - `INVOICER_PDF__WKHTMLTOPDF_PATH=/usr/local/bin/wkhtmltopdf`
  /// - `INVOICER_LOGO__MAX_BYTES=1048576`
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("INVOICER")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }

  pub fn bind_address(&self) -> (String, u16) {
    (self.server.host.clone(), self.server.port)
  }
}
