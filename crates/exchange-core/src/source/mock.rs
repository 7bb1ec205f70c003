//! Mock Rate Source
//!
//! For testing and demo purposes. Serves the same static quotes for every
//! date unless told otherwise.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::RateSource;
use crate::error::{ExchangeError, Result};
use crate::model::{DailyRateDocument, RateEntry};
use crate::route::EgressRoute;

/// Mock source with static quotes and scripted failures
pub struct MockRateSource {
    entries: Vec<RateEntry>,
    unavailable: HashSet<NaiveDate>,
    failing: HashSet<NaiveDate>,
    latency: HashMap<NaiveDate, Duration>,
    calls: AtomicUsize,
    routes_seen: Mutex<Vec<(NaiveDate, EgressRoute)>>,
}

impl Default for MockRateSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRateSource {
    /// Source quoting EUR, USD and PLN (reference rate only)
    pub fn new() -> Self {
        Self::with_entries(vec![
            RateEntry::reference("", Decimal::ONE, Decimal::ONE),
            RateEntry::new("EUR", Decimal::new(44_8512, 4), Decimal::new(44_0135, 4)),
            RateEntry::new("USD", Decimal::new(41_4500, 4), Decimal::new(40_9500, 4)),
            RateEntry::reference("PLN", Decimal::new(10_3617, 4), Decimal::new(10_3617, 4)),
        ])
    }

    pub fn with_entries(entries: Vec<RateEntry>) -> Self {
        Self {
            entries,
            unavailable: HashSet::new(),
            failing: HashSet::new(),
            latency: HashMap::new(),
            calls: AtomicUsize::new(0),
            routes_seen: Mutex::new(Vec::new()),
        }
    }

    /// Answer `date` with a body that carries no rates
    #[must_use]
    pub fn unavailable_on(mut self, date: NaiveDate) -> Self {
        self.unavailable.insert(date);
        self
    }

    /// Fail the transport for `date`
    #[must_use]
    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.failing.insert(date);
        self
    }

    /// Delay the answer for `date`
    #[must_use]
    pub fn with_latency(mut self, date: NaiveDate, latency: Duration) -> Self {
        self.latency.insert(date, latency);
        self
    }

    /// Number of `fetch_day` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Dates fetched with the route each one used, in call order
    pub fn routes_seen(&self) -> Vec<(NaiveDate, EgressRoute)> {
        self.routes_seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RateSource for MockRateSource {
    async fn fetch_day(&self, date: NaiveDate, route: &EgressRoute) -> Result<DailyRateDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.routes_seen.lock() {
            seen.push((date, route.clone()));
        }

        if let Some(latency) = self.latency.get(&date) {
            tokio::time::sleep(*latency).await;
        }

        if self.failing.contains(&date) {
            return Err(ExchangeError::Upstream {
                date,
                reason: "HTTP 503 Service Unavailable".into(),
            });
        }
        if self.unavailable.contains(&date) {
            return Ok(DailyRateDocument::unavailable(date));
        }

        Ok(DailyRateDocument::Available {
            date,
            entries: self.entries.clone(),
        })
    }

    fn name(&self) -> &str {
        "MockRates"
    }
}
