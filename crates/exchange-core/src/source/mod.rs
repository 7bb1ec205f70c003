//! Rate Sources
//!
//! Abstraction over the upstream provider of daily exchange-rate documents.

mod mock;
mod privatbank;

pub use mock::MockRateSource;
pub use privatbank::{PrivatBankClient, SourceConfig};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::model::DailyRateDocument;
use crate::route::EgressRoute;

/// Upstream rate source (Strategy pattern)
///
/// `Err` means the date could not be fetched at all; callers degrade it to
/// [`DailyRateDocument::Unavailable`].
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the rate document for one date through `route`
    async fn fetch_day(&self, date: NaiveDate, route: &EgressRoute) -> Result<DailyRateDocument>;

    /// Source name
    fn name(&self) -> &str;
}
