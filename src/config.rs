use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::info;
use url::Url;
use validator::{Validate, ValidationError};

use crate::errors::ScanError;

/// Default values for configuration
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_DIR: &str = "config";
const DEFAULT_SCAN_PATH: &str = "/api/barcode/";
const DEFAULT_LINK_PATH: &str = "/api/barcode/link/";
const DEFAULT_TRANSFER_PATH: &str = "/api/stock/transfer/";
const DEFAULT_STOCK_ITEM_PATH: &str = "/api/stock/";

/// Relative paths of the backend endpoints this client talks to.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Generic barcode scan endpoint
    #[serde(default = "default_scan_path")]
    pub scan: String,

    /// Barcode association endpoint
    #[serde(default = "default_link_path")]
    pub link: String,

    /// Batch stock transfer endpoint
    #[serde(default = "default_transfer_path")]
    pub transfer: String,

    /// Stock item detail endpoint prefix (used for unlink PATCH requests)
    #[serde(default = "default_stock_item_path")]
    pub stock_item: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            scan: default_scan_path(),
            link: default_link_path(),
            transfer: default_transfer_path(),
            stock_item: default_stock_item_path(),
        }
    }
}

/// Client configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScannerConfig {
    /// Base URL of the inventory backend
    #[validate(custom = "validate_base_url")]
    pub base_url: String,

    /// API token sent as an `Authorization: Token ...` header
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Placeholder text rendered inside the barcode input
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Hint string rendered below the barcode input
    #[serde(default = "default_hint")]
    pub hint: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Endpoint paths
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
            placeholder: default_placeholder(),
            hint: default_hint(),
            log_level: default_log_level(),
            log_json: false,
            endpoints: EndpointConfig::default(),
        }
    }
}

impl ScannerConfig {
    /// Shorthand constructor for embedding applications that only need to
    /// point the client at a backend.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

fn default_scan_path() -> String {
    DEFAULT_SCAN_PATH.to_string()
}

fn default_link_path() -> String {
    DEFAULT_LINK_PATH.to_string()
}

fn default_transfer_path() -> String {
    DEFAULT_TRANSFER_PATH.to_string()
}

fn default_stock_item_path() -> String {
    DEFAULT_STOCK_ITEM_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_placeholder() -> String {
    "Scan barcode data here using wedge scanner".to_string()
}

fn default_hint() -> String {
    "Enter barcode data".to_string()
}

fn validate_base_url(value: &str) -> Result<(), ValidationError> {
    Url::parse(value).map_err(|_| ValidationError::new("invalid_base_url"))?;
    Ok(())
}

/// Load configuration from `config/default` plus an environment-specific
/// file, with `STOCKSCAN__`-prefixed environment variables taking
/// precedence over both.
pub fn load_config() -> Result<ScannerConfig, ScanError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)
        .map_err(config_error)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)
        .map_err(config_error)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("STOCKSCAN").separator("__"))
        .build()
        .map_err(config_error)?;

    let config: ScannerConfig = config.try_deserialize().map_err(config_error)?;

    config
        .validate()
        .map_err(|e| ScanError::Config(format!("invalid configuration: {}", e)))?;

    Ok(config)
}

fn config_error(e: ConfigError) -> ScanError {
    ScanError::Config(e.to_string())
}
