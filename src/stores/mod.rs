//! Store adapters: one upstream request each, normalized into [`OfferItem`]s.

pub mod city_gross;
pub mod envelope;
pub mod ica;
pub mod id;
pub mod willys;

pub use city_gross::CityGross;
pub use envelope::{Candidates, Record};
pub use ica::Ica;
pub use id::StoreId;
pub use willys::Willys;

use crate::client::{JsonFetch, UpstreamRequest};
use crate::config::{Config, StoreConfig};
use crate::models::{OfferItem, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// A single upstream store.
///
/// `fetch` never fails: transport problems become [`StoreResult::error`] and
/// unrecognised responses become an empty item list.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Settings this adapter was built with.
    fn config(&self) -> &StoreConfig;

    /// Transport used for the upstream call.
    fn client(&self) -> &dyn JsonFetch;

    /// Where the product list may live in a response, in priority order.
    fn list_candidates(&self) -> Candidates;

    /// Maps one product record into the unified schema.
    fn normalize_record(&self, record: Record<'_>) -> OfferItem;

    /// Which store this is.
    fn store(&self) -> StoreId {
        self.config().store
    }

    /// Normalizes a raw response, capped at the store's `max_items`.
    ///
    /// Returns `None` when no product list could be located.
    fn normalize(&self, payload: &Value) -> Option<Vec<OfferItem>> {
        let list = envelope::locate_list(payload, self.list_candidates())?;

        let items = list
            .iter()
            .filter_map(|value| {
                let record = Record::new(value);
                if record.is_none() {
                    trace!("Skipping non-object entry in {} list", self.store());
                }
                record
            })
            .take(self.config().max_items)
            .map(|record| self.normalize_record(record))
            .collect();

        Some(items)
    }

    /// Fetches and normalizes this store's current offers.
    async fn fetch(&self) -> StoreResult {
        let config = self.config();
        let request = UpstreamRequest::from_store(config);

        let payload = match self.client().fetch_json(&request).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("{} fetch failed: {}", config.name, e);
                return StoreResult::failed(&config.name, config.store, e.to_string())
                    .with_source_url(request.url);
            }
        };

        let (items, note) = match self.normalize(&payload) {
            Some(items) if items.is_empty() => (items, "upstream returned an empty offer list"),
            Some(items) => (items, "upstream returned usable offer data"),
            None => {
                debug!("{} response has no recognised offer list", config.name);
                (Vec::new(), "upstream response did not contain a recognised offer list")
            }
        };

        info!("{}: {} offers", config.name, items.len());

        StoreResult::with_items(&config.name, config.store, items)
            .with_source_url(request.url)
            .with_note(note)
    }
}

/// Builds the adapter for one store.
pub fn adapter_for(
    store: StoreId,
    config: StoreConfig,
    client: Arc<dyn JsonFetch>,
) -> Arc<dyn StoreAdapter> {
    match store {
        StoreId::CityGross => Arc::new(CityGross::new(config, client)),
        StoreId::Willys => Arc::new(Willys::new(config, client)),
        StoreId::Ica => Arc::new(Ica::new(config, client)),
    }
}

/// Builds every adapter in report order from the loaded configuration.
pub fn build_adapters(config: &Config, client: Arc<dyn JsonFetch>) -> Vec<Arc<dyn StoreAdapter>> {
    StoreId::all()
        .iter()
        .map(|&store| adapter_for(store, config.store(store), Arc::clone(&client)))
        .collect()
}
