//! Hub
//!
//! Dispatches each inbound line: chat is broadcast with the sender's name,
//! `exchange` commands run the fetch pipeline and broadcast the table.

use std::sync::Arc;

use exchange_core::{Command, RateFetcher, RateTable, Result, dates, render_table};

use crate::config::ExchangeDefaults;
use crate::registry::{Peer, PeerRegistry};

/// Sent to everyone before an exchange lookup starts
pub const SEARCHING_NOTICE: &str = "Searching exchange rates...";

/// Validated parameters for one lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeRequest {
    pub days: usize,
    pub currencies: Vec<String>,
}

/// Command dispatcher shared by all connections
pub struct Hub {
    registry: Arc<PeerRegistry>,
    fetcher: RateFetcher,
    defaults: ExchangeDefaults,
}

impl Hub {
    pub fn new(registry: Arc<PeerRegistry>, fetcher: RateFetcher, defaults: ExchangeDefaults) -> Self {
        Self {
            registry,
            fetcher,
            defaults,
        }
    }

    pub fn registry(&self) -> &Arc<PeerRegistry> {
        &self.registry
    }

    /// Handle one inbound line from `peer`
    ///
    /// Command errors become a broadcast notice; they never end the connection.
    pub async fn handle_message(&self, peer: &Peer, text: &str) {
        let outcome = match Command::parse(text) {
            Ok(Command::Chat(text)) => {
                self.registry.broadcast(&format!("{}: {}", peer.name, text)).await;
                Ok(())
            }
            Ok(Command::ExchangeDefault) => {
                tracing::info!("Get exchange with default parameters");
                self.exchange(self.defaults.days, Vec::new()).await
            }
            Ok(Command::ExchangeCustom { days, currencies }) => {
                tracing::info!("Get exchange with custom parameters: {}, {:?}", days, currencies);
                self.exchange(days, currencies).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            tracing::warn!("Command from {} failed: {}", peer.name, e);
            self.registry.broadcast(&e.user_message()).await;
        }
    }

    /// Validate, announce, fetch and broadcast
    async fn exchange(&self, days: i64, currencies: Vec<String>) -> Result<()> {
        let request = self.request(days, currencies)?;
        self.registry.broadcast(SEARCHING_NOTICE).await;

        let table = self.lookup(&request).await?;
        self.registry.broadcast(&render_table(&table)).await;
        Ok(())
    }

    /// Resolve defaults; an explicit currency list always wins
    fn request(&self, days: i64, currencies: Vec<String>) -> Result<ExchangeRequest> {
        let days = dates::validate_days(days)?;
        let currencies = if currencies.is_empty() {
            self.defaults.currencies.clone()
        } else {
            currencies
        };
        Ok(ExchangeRequest { days, currencies })
    }

    /// Fetch every date of `request` and aggregate
    pub async fn lookup(&self, request: &ExchangeRequest) -> Result<RateTable> {
        let dates = dates::generate(request.days);
        let documents = self.fetcher.fetch_all(&dates).await;
        let unavailable = documents.iter().filter(|d| !d.is_available()).count();
        if unavailable > 0 {
            tracing::warn!("{} of {} dates unavailable", unavailable, documents.len());
        }
        RateTable::build(&documents, &request.currencies)
    }
}
