//! # exchange-core
//!
//! Historical exchange-rate lookup for the chat hub: command parsing,
//! concurrent multi-date fetching and row/column aggregation.
//!
//! ## Pipeline
//!
//! ```text
//! "exchange 3 EUR USD"
//!        │  Command::parse
//!        ▼
//! ExchangeCustom { days: 3, currencies: [EUR, USD] }
//!        │  dates::generate
//!        ▼
//! [17.10, 16.10, 15.10] ──► RateFetcher ──► one task per date
//!                               │            (direct, proxy 1, proxy 2, ...)
//!                               ▼
//!                    [doc, doc, Unavailable]  (request order)
//!                               │  RateTable::build
//!                               ▼
//!              ┌──────────┬──────┬───────┬───────┬───────┐
//!              │          │ Date │ 17.10 │ 16.10 │ 15.10 │
//!              │ EUR      │ Sale │ 44.86 │ 44.80 │   -   │
//!              │          │ Buy  │ 44.00 │ 43.95 │   -   │
//!              │ USD      │ ...  │       │       │       │
//!              └──────────┴──────┴───────┴───────┴───────┘
//! ```

pub mod command;
pub mod dates;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod render;
pub mod route;
pub mod source;
pub mod table;

pub use command::Command;
pub use error::{ExchangeError, Result};
pub use fetcher::RateFetcher;
pub use model::{DailyRateDocument, RateEntry, Side};
pub use render::render_table;
pub use route::{EgressRoute, RoutePool};
pub use source::{MockRateSource, PrivatBankClient, RateSource, SourceConfig};
pub use table::{RateRow, RateTable};

/// Currencies shown by a bare `exchange`
pub const DEFAULT_CURRENCIES: [&str; 2] = ["EUR", "USD"];

/// Days shown by a bare `exchange`
pub const DEFAULT_DAYS: i64 = 1;
