//! Chat Command Parsing
//!
//! Every inbound chat line is classified into one of three shapes:
//!
//! - `exchange` alone: default rate lookup
//! - `exchange <days> [CODE...]`: custom rate lookup
//! - anything else: plain chat text

use crate::error::{ExchangeError, Result};

/// Keyword that starts a rate lookup
pub const EXCHANGE_KEYWORD: &str = "exchange";

/// Classified intent of one inbound line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Plain text, broadcast verbatim with the sender's name
    Chat(String),

    /// `exchange` with no arguments
    ExchangeDefault,

    /// `exchange <days> [CODE...]`
    ExchangeCustom { days: i64, currencies: Vec<String> },
}

impl Command {
    /// Parse a raw chat line
    ///
    /// A non-integer day count is a hard error; callers turn it into a notice.
    pub fn parse(text: &str) -> Result<Self> {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        match tokens.as_slice() {
            [keyword] if *keyword == EXCHANGE_KEYWORD => Ok(Self::ExchangeDefault),
            [keyword, days, codes @ ..] if *keyword == EXCHANGE_KEYWORD => {
                let days = parse_days(days)?;
                Ok(Self::ExchangeCustom {
                    days,
                    currencies: normalize_codes(codes),
                })
            }
            _ => Ok(Self::Chat(text.to_string())),
        }
    }
}

/// Integer day count; integers too large for `i64` saturate so range
/// validation still rejects them as out of range
fn parse_days(token: &str) -> Result<i64> {
    if let Ok(days) = token.parse::<i64>() {
        return Ok(days);
    }

    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(if negative { i64::MIN } else { i64::MAX })
    } else {
        Err(ExchangeError::MalformedCommand(token.to_string()))
    }
}

/// Upper-case codes and split on commas so `eur,usd` reads as `EUR USD`
fn normalize_codes(tokens: &[&str]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|token| token.split(','))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_uppercase)
        .collect()
}
