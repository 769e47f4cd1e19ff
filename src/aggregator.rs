//! Concurrent fan-out over every store adapter.

use crate::models::AggregateReport;
use crate::stores::StoreAdapter;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Fetches every configured store and merges the results.
pub struct OfferAggregator {
    adapters: Vec<Arc<dyn StoreAdapter>>,
}

impl OfferAggregator {
    /// Creates an aggregator over adapters in report order.
    pub fn new(adapters: Vec<Arc<dyn StoreAdapter>>) -> Self {
        Self { adapters }
    }

    /// Fetches all stores concurrently.
    ///
    /// Results keep the adapters' order. A failing store contributes its own
    /// error result and nothing else.
    pub async fn fetch_all(&self) -> AggregateReport {
        let results = join_all(self.adapters.iter().map(|adapter| adapter.fetch())).await;
        let report = AggregateReport::new(results);

        if report.failed_count() > 0 {
            warn!("{} of {} stores failed", report.failed_count(), report.stores.len());
        }
        info!("Fetched {} offers from {} stores", report.total_items, report.stores.len());

        report
    }
}
