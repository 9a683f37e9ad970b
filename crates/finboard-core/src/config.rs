//! Dashboard configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override at `~/.config/finboard/config.toml`
//! 2. Embedded defaults (compiled into the binary)
//!
//! Keys missing from an override keep their default values. The API base
//! URL can also be set with `FINBOARD_API_BASE`, which wins over both layers.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::DEFAULT_CURRENCY_SYMBOL;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/finboard.toml");

/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "FINBOARD_API_BASE";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Time-to-live per query family
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheConfig {
    /// Transaction listings
    pub transactions_ttl: Duration,
    /// Accounts, monthly spend, and budget status
    pub aggregates_ttl: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    pub currency: String,
    pub timezone: String,
    pub top_categories: usize,
    pub recent_transactions: u32,
    pub trend_months: u32,
    pub kpi_transaction_limit: u32,
    pub transactions_page_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8010".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            transactions_ttl: Duration::from_secs(30),
            aggregates_ttl: Duration::from_secs(60),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            currency: "USD".to_string(),
            timezone: "America/New_York".to_string(),
            top_categories: 8,
            recent_transactions: 6,
            trend_months: 12,
            kpi_transaction_limit: 1000,
            transactions_page_limit: 50,
        }
    }
}

impl DashboardConfig {
    /// Load from `path` (or the default override location), then apply
    /// the environment override
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = load_config(path)?;
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            let base = base.trim().trim_end_matches('/');
            if !base.is_empty() {
                config.api.base_url = base.to_string();
            }
        }
        Ok(config)
    }

    /// Parse config from TOML content layered over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// The embedded defaults
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("finboard").join("config.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<DashboardConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let content = match path {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading config override");
            fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    cache: Option<RawCache>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawCache {
    transactions_ttl_secs: Option<u64>,
    aggregates_ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency_symbol: Option<String>,
    currency: Option<String>,
    timezone: Option<String>,
    top_categories: Option<usize>,
    recent_transactions: Option<u32>,
    trend_months: Option<u32>,
    kpi_transaction_limit: Option<u32>,
    transactions_page_limit: Option<u32>,
}

fn parse_config(content: &str) -> Result<DashboardConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut config = DashboardConfig::default();

    if let Some(api) = raw.api {
        if let Some(base_url) = api.base_url {
            config.api.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = api.timeout_secs {
            config.api.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(cache) = raw.cache {
        if let Some(ttl) = cache.transactions_ttl_secs {
            config.cache.transactions_ttl = Duration::from_secs(ttl);
        }
        if let Some(ttl) = cache.aggregates_ttl_secs {
            config.cache.aggregates_ttl = Duration::from_secs(ttl);
        }
    }

    if let Some(display) = raw.display {
        let d = &mut config.display;
        if let Some(symbol) = display.currency_symbol {
            d.currency_symbol = symbol;
        }
        if let Some(currency) = display.currency {
            d.currency = currency;
        }
        if let Some(tz) = display.timezone {
            d.timezone = tz;
        }
        if let Some(n) = display.top_categories {
            d.top_categories = n;
        }
        if let Some(n) = display.recent_transactions {
            d.recent_transactions = n;
        }
        if let Some(n) = display.trend_months {
            d.trend_months = n;
        }
        if let Some(n) = display.kpi_transaction_limit {
            d.kpi_transaction_limit = n;
        }
        if let Some(n) = display.transactions_page_limit {
            d.transactions_page_limit = n;
        }
    }

    Ok(config)
}
