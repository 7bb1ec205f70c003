//! PrivatBank Archive Client
//!
//! Fetches historical rates from `GET <base>?json&date=DD.MM.YYYY`.
//!
//! Certificate validation is disabled for every route. The upstream host is
//! fixed by configuration and reached through forward proxies that do not
//! present its certificate; this is a deliberate trust boundary.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Proxy, StatusCode};
use serde::Deserialize;

use super::RateSource;
use crate::error::{ExchangeError, Result};
use crate::model::{DailyRateDocument, RateEntry};
use crate::route::{EgressRoute, RoutePool};

/// Default archive endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

/// Default forward proxies, all on port 8443
pub const DEFAULT_PROXY_HOSTS: [&str; 5] = [
    "37.19.220.129",
    "37.19.220.179",
    "37.19.220.180",
    "138.199.48.1",
    "138.199.48.4",
];

pub const DEFAULT_PROXY_PORT: u16 = 8443;

/// Upstream source configuration
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Archive endpoint without query string
    pub base_url: String,

    /// Forward proxies in assignment order (direct is implied first)
    pub proxies: Vec<EgressRoute>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            proxies: DEFAULT_PROXY_HOSTS
                .iter()
                .map(|host| EgressRoute::proxy(&format!("{host}:{DEFAULT_PROXY_PORT}")))
                .collect(),
        }
    }
}

impl SourceConfig {
    /// Read `RATES_BASE_URL` and `RATES_PROXIES` (comma-separated `host:port`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("RATES_BASE_URL").unwrap_or(defaults.base_url);
        let proxies = std::env::var("RATES_PROXIES")
            .map(|list| parse_proxy_list(&list))
            .unwrap_or(defaults.proxies);

        Self { base_url, proxies }
    }

    pub fn route_pool(&self) -> RoutePool {
        RoutePool::new(self.proxies.clone())
    }
}

fn parse_proxy_list(list: &str) -> Vec<EgressRoute> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(EgressRoute::proxy)
        .collect()
}

/// Wire shape of one archive response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveDay {
    #[serde(default)]
    exchange_rate: Option<Vec<RateEntry>>,
}

/// HTTP client for the PrivatBank rate archive
///
/// Holds one `reqwest::Client` per egress route, since proxies are a
/// client-level setting.
pub struct PrivatBankClient {
    base_url: String,
    clients: HashMap<EgressRoute, Client>,
}

impl PrivatBankClient {
    /// Build clients for every route in `pool`
    pub fn new(base_url: impl Into<String>, pool: &RoutePool) -> Result<Self> {
        let clients = pool
            .routes()
            .iter()
            .map(|route| Ok((route.clone(), build_client(route)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            base_url: base_url.into(),
            clients,
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), &config.route_pool())
    }

    /// Request URL for one date
    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}?json&date={}", self.base_url, date.format("%d.%m.%Y"))
    }

    fn client_for(&self, route: &EgressRoute) -> Result<Client> {
        match self.clients.get(route) {
            Some(client) => Ok(client.clone()),
            None => build_client(route),
        }
    }
}

fn build_client(route: &EgressRoute) -> Result<Client> {
    let builder = Client::builder().danger_accept_invalid_certs(true);
    let builder = match route {
        EgressRoute::Direct => builder.no_proxy(),
        EgressRoute::Proxy(url) => builder.proxy(
            Proxy::all(url).map_err(|e| ExchangeError::Config(format!("proxy {url}: {e}")))?,
        ),
    };
    Ok(builder.build()?)
}

/// Turn a decoded archive body into a document
fn into_document(date: NaiveDate, day: ArchiveDay) -> DailyRateDocument {
    match day.exchange_rate {
        Some(entries) if !entries.is_empty() => DailyRateDocument::Available { date, entries },
        _ => DailyRateDocument::unavailable(date),
    }
}

#[async_trait]
impl RateSource for PrivatBankClient {
    async fn fetch_day(&self, date: NaiveDate, route: &EgressRoute) -> Result<DailyRateDocument> {
        let url = self.url_for(date);
        tracing::debug!("GET {} via {}", url, route);

        let response = self.client_for(route)?.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ExchangeError::Upstream {
                date,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body = response.text().await?;
        let day: ArchiveDay = serde_json::from_str(&body)?;
        Ok(into_document(date, day))
    }

    fn name(&self) -> &str {
        "PrivatBank"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Side;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_url_embeds_date() {
        let client = PrivatBankClient::new("https://example.test/rates", &RoutePool::direct()).unwrap();
        assert_eq!(
            client.url_for(date()),
            "https://example.test/rates?json&date=07.03.2024"
        );
    }

    #[test]
    fn test_default_config_routes() {
        let config = SourceConfig::default();
        let pool = config.route_pool();
        assert_eq!(pool.len(), 6);
        assert_eq!(pool.route_for(0), &EgressRoute::Direct);
        assert_eq!(
            pool.route_for(1),
            &EgressRoute::Proxy("http://37.19.220.129:8443".into())
        );
    }

    #[test]
    fn test_parse_proxy_list() {
        assert_eq!(
            parse_proxy_list("1.2.3.4:80, ,5.6.7.8:81"),
            vec![EgressRoute::proxy("1.2.3.4:80"), EgressRoute::proxy("5.6.7.8:81")]
        );
        assert!(parse_proxy_list("").is_empty());
    }

    #[test]
    fn test_archive_body_with_rates() {
        let body = r#"{
            "date": "07.03.2024",
            "bank": "PB",
            "baseCurrency": 980,
            "baseCurrencyLit": "UAH",
            "exchangeRate": [
                {"baseCurrency": "UAH", "saleRateNB": 1.0, "purchaseRateNB": 1.0},
                {"baseCurrency": "UAH", "currency": "EUR", "saleRateNB": 41.63, "purchaseRateNB": 41.63, "saleRate": 42.1, "purchaseRate": 41.2},
                {"baseCurrency": "UAH", "currency": "PLN", "saleRateNB": 9.63, "purchaseRateNB": 9.63}
            ]
        }"#;
        let day: ArchiveDay = serde_json::from_str(body).unwrap();
        let doc = into_document(date(), day);

        assert!(doc.is_available());
        assert_eq!(doc.entry("EUR").and_then(|e| e.rate(Side::Sale)), Some(dec!(42.1)));
        assert_eq!(doc.entry("PLN").and_then(|e| e.rate(Side::Buy)), Some(dec!(9.63)));
    }

    #[test]
    fn test_archive_body_without_rates() {
        let day: ArchiveDay = serde_json::from_str(r#"{"date": "07.03.2024"}"#).unwrap();
        assert_eq!(into_document(date(), day), DailyRateDocument::unavailable(date()));

        let day: ArchiveDay =
            serde_json::from_str(r#"{"date": "07.03.2024", "exchangeRate": []}"#).unwrap();
        assert_eq!(into_document(date(), day), DailyRateDocument::unavailable(date()));
    }
}
