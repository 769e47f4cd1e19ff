//! grocery-offers - Weekly offers from Swedish grocery stores
//!
//! Fetches City Gross, Willys and ICA promotions and normalizes them into a
//! single offer schema.

pub mod aggregator;
pub mod client;
pub mod commands;
pub mod config;
pub mod format;
pub mod models;
pub mod price;
pub mod router;
pub mod stores;

pub use aggregator::OfferAggregator;
pub use commands::OfferService;
pub use config::Config;
pub use models::{AggregateReport, OfferItem, StoreResult};
pub use price::parse_price;
pub use router::{StoreRouter, UnsupportedStore};
pub use stores::{StoreAdapter, StoreId};
