//! Offer lookup operations and the command that renders them.

use crate::aggregator::OfferAggregator;
use crate::client::{HttpClient, JsonFetch};
use crate::config::Config;
use crate::format::Formatter;
use crate::models::{AggregateReport, StoreResult};
use crate::router::{StoreRouter, UnsupportedStore};
use crate::stores::{build_adapters, StoreAdapter, StoreId};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// The operations exposed to callers.
pub struct OfferService {
    adapters: Vec<Arc<dyn StoreAdapter>>,
    aggregator: OfferAggregator,
    router: StoreRouter,
}

impl OfferService {
    /// Creates a service over the production HTTP client.
    pub fn new(config: &Config) -> Result<Self> {
        let client = HttpClient::new(config).context("Failed to create HTTP client")?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Creates a service with a provided transport (for testing).
    pub fn with_client(config: &Config, client: Arc<dyn JsonFetch>) -> Self {
        let adapters = build_adapters(config, client);
        Self {
            aggregator: OfferAggregator::new(adapters.clone()),
            router: StoreRouter::new(adapters.clone()),
            adapters,
        }
    }

    /// Configured adapters in report order.
    pub fn adapters(&self) -> &[Arc<dyn StoreAdapter>] {
        &self.adapters
    }

    pub async fn get_city_gross_offers(&self) -> StoreResult {
        self.fetch_store(StoreId::CityGross).await
    }

    pub async fn get_willys_offers(&self) -> StoreResult {
        self.fetch_store(StoreId::Willys).await
    }

    pub async fn get_ica_offers(&self) -> StoreResult {
        self.fetch_store(StoreId::Ica).await
    }

    /// Fetches every store concurrently into one report.
    pub async fn get_all_grocery_offers(&self) -> AggregateReport {
        self.aggregator.fetch_all().await
    }

    /// Fetches the store a free-text name refers to.
    pub async fn get_store_offers(
        &self,
        store_name: &str,
    ) -> Result<StoreResult, UnsupportedStore> {
        let adapter = self.router.resolve(store_name)?;
        info!("Resolved '{}' to {}", store_name, adapter.store());
        Ok(adapter.fetch().await)
    }

    /// Fetches one known store.
    pub async fn fetch_store(&self, store: StoreId) -> StoreResult {
        match self.router.get(store) {
            Some(adapter) => adapter.fetch().await,
            None => StoreResult::failed(store.display_name(), store, "store is not configured"),
        }
    }
}

/// What the offers command should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferQuery {
    /// Every store
    All,
    /// One store by id
    Store(StoreId),
    /// One store by free-text name
    Named(String),
}

/// Fetches offers and renders them.
pub struct OffersCommand {
    config: Config,
}

impl OffersCommand {
    /// Creates a new offers command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the query and returns formatted output.
    pub async fn execute(&self, query: OfferQuery) -> Result<String> {
        let service = OfferService::new(&self.config)?;
        Ok(self.execute_with_service(&service, query).await)
    }

    /// Executes the query against a provided service (for testing).
    pub async fn execute_with_service(&self, service: &OfferService, query: OfferQuery) -> String {
        let formatter = Formatter::new(self.config.format);

        match query {
            OfferQuery::All => formatter.format_report(&service.get_all_grocery_offers().await),
            OfferQuery::Store(store) => formatter.format_store(&service.fetch_store(store).await),
            OfferQuery::Named(name) => match service.get_store_offers(&name).await {
                Ok(result) => formatter.format_store(&result),
                Err(e) => formatter.format_error(&e.to_string()),
            },
        }
    }
}
