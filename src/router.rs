//! Free-text store name resolution.

use crate::stores::{StoreAdapter, StoreId};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// The requested store is not one of the supported stores.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Store '{requested}' not supported. Available stores: {available}")]
pub struct UnsupportedStore {
    pub requested: String,
    pub available: String,
}

impl UnsupportedStore {
    pub fn new(requested: impl Into<String>) -> Self {
        Self { requested: requested.into(), available: StoreId::supported_names() }
    }
}

/// Routes store names to their adapters.
pub struct StoreRouter {
    adapters: Vec<Arc<dyn StoreAdapter>>,
}

impl StoreRouter {
    pub fn new(adapters: Vec<Arc<dyn StoreAdapter>>) -> Self {
        Self { adapters }
    }

    /// Resolves a free-text store name, case-insensitively.
    pub fn resolve(&self, name: &str) -> Result<&dyn StoreAdapter, UnsupportedStore> {
        let store = StoreId::resolve(name).ok_or_else(|| UnsupportedStore::new(name))?;
        self.get(store).ok_or_else(|| UnsupportedStore::new(name))
    }

    /// Returns the adapter for a known store, if configured.
    pub fn get(&self, store: StoreId) -> Option<&dyn StoreAdapter> {
        self.adapters.iter().find(|a| a.store() == store).map(|a| a.as_ref())
    }
}
