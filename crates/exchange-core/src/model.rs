//! Domain Models
//!
//! Per-day rate documents as delivered by the upstream source.
//! Uses `rust_decimal` for all rate values - never use f64 for money!

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the quote a table row shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Sale,
    Buy,
}

impl Side {
    /// Row order within one currency
    pub const ALL: [Self; 2] = [Self::Sale, Self::Buy];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sale => "Sale",
            Self::Buy => "Buy",
        }
    }
}

/// One currency quote within a daily document
///
/// Commercial rates are absent for some currencies; the national-bank
/// reference rate is used in their place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    /// Currency code (e.g., "EUR"); empty on the base-currency entry
    #[serde(default)]
    pub currency: String,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sale_rate: Option<Decimal>,

    #[serde(default, rename = "saleRateNB", with = "rust_decimal::serde::float_option")]
    pub sale_rate_nb: Option<Decimal>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub purchase_rate: Option<Decimal>,

    #[serde(default, rename = "purchaseRateNB", with = "rust_decimal::serde::float_option")]
    pub purchase_rate_nb: Option<Decimal>,
}

impl RateEntry {
    /// Entry carrying commercial rates only
    pub fn new(currency: impl Into<String>, sale: Decimal, purchase: Decimal) -> Self {
        Self {
            currency: currency.into().to_uppercase(),
            sale_rate: Some(sale),
            sale_rate_nb: None,
            purchase_rate: Some(purchase),
            purchase_rate_nb: None,
        }
    }

    /// Entry carrying reference rates only
    pub fn reference(currency: impl Into<String>, sale: Decimal, purchase: Decimal) -> Self {
        Self {
            currency: currency.into().to_uppercase(),
            sale_rate: None,
            sale_rate_nb: Some(sale),
            purchase_rate: None,
            purchase_rate_nb: Some(purchase),
        }
    }

    /// Primary rate for `side`, falling back to the reference rate
    pub fn rate(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::Sale => self.sale_rate.or(self.sale_rate_nb),
            Side::Buy => self.purchase_rate.or(self.purchase_rate_nb),
        }
    }
}

/// Parsed upstream response for one calendar date
#[derive(Clone, Debug, PartialEq)]
pub enum DailyRateDocument {
    Available { date: NaiveDate, entries: Vec<RateEntry> },
    Unavailable { date: NaiveDate },
}

impl DailyRateDocument {
    pub const fn unavailable(date: NaiveDate) -> Self {
        Self::Unavailable { date }
    }

    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Available { date, .. } | Self::Unavailable { date } => *date,
        }
    }

    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// First entry quoting `currency`, if any
    pub fn entry(&self, currency: &str) -> Option<&RateEntry> {
        match self {
            Self::Available { entries, .. } => entries
                .iter()
                .find(|entry| !entry.currency.is_empty() && entry.currency == currency),
            Self::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_fallback() {
        let commercial = RateEntry::new("usd", dec!(41.5), dec!(41.0));
        assert_eq!(commercial.currency, "USD");
        assert_eq!(commercial.rate(Side::Sale), Some(dec!(41.5)));
        assert_eq!(commercial.rate(Side::Buy), Some(dec!(41.0)));

        let reference = RateEntry::reference("PLN", dec!(10.2), dec!(10.1));
        assert_eq!(reference.rate(Side::Sale), Some(dec!(10.2)));
        assert_eq!(reference.rate(Side::Buy), Some(dec!(10.1)));
    }

    #[test]
    fn test_entry_deserialization() {
        let json = r#"{"baseCurrency":"UAH","currency":"EUR","saleRateNB":45.1,"purchaseRateNB":45.1,"saleRate":45.6,"purchaseRate":44.9}"#;
        let entry: RateEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.currency, "EUR");
        assert_eq!(entry.rate(Side::Sale), Some(dec!(45.6)));
        assert_eq!(entry.rate(Side::Buy), Some(dec!(44.9)));

        let base: RateEntry =
            serde_json::from_str(r#"{"baseCurrency":"UAH","saleRateNB":1.0}"#).unwrap();
        assert!(base.currency.is_empty());
        assert_eq!(base.rate(Side::Buy), None);
    }

    #[test]
    fn test_document_lookup_skips_base_entry() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let doc = DailyRateDocument::Available {
            date,
            entries: vec![
                RateEntry::reference("", dec!(1), dec!(1)),
                RateEntry::new("EUR", dec!(45), dec!(44)),
            ],
        };
        assert_eq!(doc.entry("EUR").map(|e| e.rate(Side::Sale)), Some(Some(dec!(45))));
        assert!(doc.entry("").is_none());
        assert!(DailyRateDocument::unavailable(date).entry("EUR").is_none());
        assert_eq!(DailyRateDocument::unavailable(date).date(), date);
    }
}
