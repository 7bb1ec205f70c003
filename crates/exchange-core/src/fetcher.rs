//! Rate Fetcher
//!
//! Fans one request out per date, each on its own task and egress route,
//! then reassembles the documents in request order.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;

use crate::model::DailyRateDocument;
use crate::route::RoutePool;
use crate::source::RateSource;

/// Concurrent multi-date fetcher
#[derive(Clone)]
pub struct RateFetcher {
    source: Arc<dyn RateSource>,
    routes: RoutePool,
}

impl RateFetcher {
    pub fn new(source: Arc<dyn RateSource>, routes: RoutePool) -> Self {
        Self { source, routes }
    }

    /// Fetch every date concurrently
    ///
    /// `output[i]` always belongs to `dates[i]`. A failed date becomes
    /// [`DailyRateDocument::Unavailable`] without affecting the others.
    pub async fn fetch_all(&self, dates: &[NaiveDate]) -> Vec<DailyRateDocument> {
        let handles: Vec<_> = dates
            .iter()
            .enumerate()
            .map(|(index, &date)| {
                let source = Arc::clone(&self.source);
                let route = self.routes.route_for(index).clone();
                tokio::spawn(async move {
                    match source.fetch_day(date, &route).await {
                        Ok(document) => document,
                        Err(e) => {
                            tracing::warn!("{} fetch for {} via {} failed: {}", source.name(), date, route, e);
                            DailyRateDocument::unavailable(date)
                        }
                    }
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(dates)
            .map(|(joined, &date)| {
                joined.unwrap_or_else(|e| {
                    tracing::error!("Fetch task for {} aborted: {}", date, e);
                    DailyRateDocument::unavailable(date)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::dates;
    use crate::route::EgressRoute;
    use crate::source::MockRateSource;

    fn request_dates(n: usize) -> Vec<NaiveDate> {
        dates::ending_at(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(), n)
    }

    #[tokio::test]
    async fn test_order_preserved_despite_latency() {
        let dates = request_dates(4);
        // Oldest answers first, newest last
        let source = MockRateSource::new()
            .with_latency(dates[0], Duration::from_millis(80))
            .with_latency(dates[1], Duration::from_millis(40))
            .with_latency(dates[2], Duration::from_millis(20));
        let fetcher = RateFetcher::new(Arc::new(source), RoutePool::direct());

        let documents = fetcher.fetch_all(&dates).await;

        assert_eq!(documents.len(), dates.len());
        for (document, date) in documents.iter().zip(&dates) {
            assert_eq!(document.date(), *date);
            assert!(document.is_available());
        }
    }

    #[tokio::test]
    async fn test_failures_degrade_single_date() {
        let dates = request_dates(3);
        let source = MockRateSource::new().failing_on(dates[1]);
        let fetcher = RateFetcher::new(Arc::new(source), RoutePool::direct());

        let documents = fetcher.fetch_all(&dates).await;

        assert!(documents[0].is_available());
        assert_eq!(documents[1], DailyRateDocument::unavailable(dates[1]));
        assert!(documents[2].is_available());
    }

    #[tokio::test]
    async fn test_routes_assigned_cyclically() {
        let dates = request_dates(5);
        let source = Arc::new(MockRateSource::new());
        let pool = RoutePool::new(vec![EgressRoute::proxy("10.0.0.1:8443")]);
        let fetcher = RateFetcher::new(source.clone(), pool.clone());

        fetcher.fetch_all(&dates).await;

        let mut seen = source.routes_seen();
        seen.sort_by_key(|(date, _)| std::cmp::Reverse(*date));
        let routes: Vec<_> = seen.into_iter().map(|(_, route)| route).collect();
        let expected: Vec<_> = (0..5).map(|i| pool.route_for(i).clone()).collect();
        assert_eq!(routes, expected);
    }

    #[tokio::test]
    async fn test_empty_request() {
        let source = Arc::new(MockRateSource::new());
        let fetcher = RateFetcher::new(source.clone(), RoutePool::direct());

        assert!(fetcher.fetch_all(&[]).await.is_empty());
        assert_eq!(source.calls(), 0);
    }
}
