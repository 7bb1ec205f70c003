//! Hub Configuration

use exchange_core::{DEFAULT_CURRENCIES, DEFAULT_DAYS, SourceConfig};

/// Listen address used when `BIND_ADDR` is unset
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Parameters for a bare `exchange` command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeDefaults {
    pub days: i64,
    pub currencies: Vec<String>,
}

impl Default for ExchangeDefaults {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            currencies: DEFAULT_CURRENCIES.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Hub configuration
#[derive(Clone, Debug)]
pub struct HubConfig {
    /// Listen address (e.g., "127.0.0.1:8080")
    pub bind_addr: String,

    /// Upstream rate source and egress routes
    pub source: SourceConfig,

    pub defaults: ExchangeDefaults,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            source: SourceConfig::default(),
            defaults: ExchangeDefaults::default(),
        }
    }
}

impl HubConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

        Self {
            bind_addr,
            source: SourceConfig::from_env(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.defaults.days, 1);
        assert_eq!(config.defaults.currencies, vec!["EUR", "USD"]);
        assert_eq!(config.source.proxies.len(), 5);
    }
}
