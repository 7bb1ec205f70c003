//! Rate Aggregation
//!
//! Merges per-day documents and a requested currency list into a
//! currency×side by date grid.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{ExchangeError, Result};
use crate::model::{DailyRateDocument, Side};

/// Decimal places shown for each rate
pub const RATE_PRECISION: u32 = 2;

/// One table row: a currency and quote side across all dates
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RateRow {
    pub currency: String,
    pub side: Side,
    /// One cell per column; `None` is the absence marker
    pub cells: Vec<Option<Decimal>>,
}

/// Aggregated currency×date grid
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RateTable {
    pub title: String,
    /// Column dates, newest first
    pub columns: Vec<NaiveDate>,
    /// Two rows (Sale, Buy) per requested currency, in request order
    pub rows: Vec<RateRow>,
}

impl RateTable {
    /// Build the grid
    ///
    /// Fails with `UnknownCurrency` when a requested code is quoted by none of
    /// the available documents. Unavailable documents only blank their column.
    pub fn build(documents: &[DailyRateDocument], currencies: &[String]) -> Result<Self> {
        let unknown = unknown_currencies(documents, currencies);
        if !unknown.is_empty() {
            return Err(ExchangeError::UnknownCurrency(unknown));
        }

        let rows = currencies
            .iter()
            .flat_map(|currency| {
                Side::ALL.into_iter().map(move |side| RateRow {
                    currency: currency.clone(),
                    side,
                    cells: documents
                        .iter()
                        .map(|document| cell(document, currency, side))
                        .collect(),
                })
            })
            .collect();

        Ok(Self {
            title: title(documents, currencies),
            columns: documents.iter().map(DailyRateDocument::date).collect(),
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

fn cell(document: &DailyRateDocument, currency: &str, side: Side) -> Option<Decimal> {
    document
        .entry(currency)
        .and_then(|entry| entry.rate(side))
        .map(|rate| rate.round_dp(RATE_PRECISION))
}

/// Codes with no match in any available document, deduplicated in request order
fn unknown_currencies(documents: &[DailyRateDocument], currencies: &[String]) -> Vec<String> {
    if !documents.iter().any(DailyRateDocument::is_available) {
        return Vec::new();
    }

    let mut unknown: Vec<String> = Vec::new();
    for currency in currencies {
        let quoted = documents
            .iter()
            .any(|document| document.entry(currency).is_some());
        if !quoted && !unknown.contains(currency) {
            unknown.push(currency.clone());
        }
    }
    unknown
}

fn short_date(date: NaiveDate) -> String {
    date.format("%d.%m").to_string()
}

fn title(documents: &[DailyRateDocument], currencies: &[String]) -> String {
    let missing: Vec<String> = documents
        .iter()
        .filter(|document| !document.is_available())
        .map(|document| document.date().format("%d.%m.%Y").to_string())
        .collect();
    if !missing.is_empty() {
        return format!("No data for {}", missing.join(", "));
    }

    let codes = currencies.join(", ");
    match documents {
        [] => format!("Exchange rates {codes}"),
        [only] => format!("Exchange rates {codes} on {}", short_date(only.date())),
        [newest, .., oldest] => format!(
            "Exchange rates {codes} from {} to {}",
            short_date(oldest.date()),
            short_date(newest.date())
        ),
    }
}
