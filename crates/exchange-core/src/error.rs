//! Error Types for Exchange Core

use chrono::NaiveDate;
use thiserror::Error;

use crate::dates::{MAX_DAYS, MIN_DAYS};

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Requested day count outside the supported window
    #[error("Invalid day count: {0}")]
    InvalidDayCount(i64),

    /// None of the fetched documents quote these codes
    #[error("Unknown currency: {}", .0.join(", "))]
    UnknownCurrency(Vec<String>),

    /// Day-count token is not an integer
    #[error("Malformed command: day count '{0}' is not an integer")]
    MalformedCommand(String),

    /// Upstream returned nothing usable for one date
    #[error("Upstream unavailable for {date}: {reason}")]
    Upstream { date: NaiveDate, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExchangeError {
    /// Convert to the chat notice broadcast to peers
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidDayCount(_) => {
                format!("Only {MIN_DAYS} to {MAX_DAYS} days can be shown.")
            }
            Self::UnknownCurrency(codes) => {
                format!("Currency {} is not available.", codes.join(", "))
            }
            Self::MalformedCommand(token) => {
                format!("Day count must be a whole number, got '{token}'.")
            }
            _ => "Exchange rates are temporarily unavailable.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_currency_names_codes() {
        let err = ExchangeError::UnknownCurrency(vec!["XYZ".into(), "ABC".into()]);
        assert_eq!(err.user_message(), "Currency XYZ, ABC is not available.");
        assert_eq!(err.to_string(), "Unknown currency: XYZ, ABC");
    }

    #[test]
    fn test_invalid_day_count_message() {
        let err = ExchangeError::InvalidDayCount(15);
        assert_eq!(err.user_message(), "Only 1 to 10 days can be shown.");
    }

    #[test]
    fn test_transport_errors_share_generic_message() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let err = ExchangeError::Upstream { date, reason: "HTTP 502".into() };
        assert_eq!(err.user_message(), "Exchange rates are temporarily unavailable.");
    }
}
