//! ICA store assortment offers (product API gateway).

use super::envelope::{Candidates, Record};
use super::StoreAdapter;
use crate::client::JsonFetch;
use crate::config::StoreConfig;
use crate::models::{OfferItem, UNKNOWN_NAME};
use crate::price::{format_kr, parse_price};
use std::sync::Arc;

const LISTS: Candidates = &[
    "/data/products",
    "/data/items",
    "/data/offers",
    "/data",
    "/products",
    "/items",
    "",
];

const NAME: Candidates = &["/name", "/productName", "/title"];
const CURRENT_PRICE: Candidates =
    &["/price/current", "/price/currentPrice", "/currentPrice", "/price"];
const ORIGINAL_PRICE: Candidates = &["/price/original", "/price/originalPrice", "/originalPrice"];
const OFFER_TEXT: Candidates = &["/offer/text"];
const UNIT: Candidates = &["/price/unit", "/unit", "/comparisonUnit"];
const IMAGE: Candidates = &["/image/url", "/imageUrl", "/images/0/url"];

/// Fallback for category and brand.
const STORE_FALLBACK: &str = "ICA";

/// ICA adapter.
pub struct Ica {
    config: StoreConfig,
    client: Arc<dyn JsonFetch>,
}

impl Ica {
    pub fn new(config: StoreConfig, client: Arc<dyn JsonFetch>) -> Self {
        Self { config, client }
    }
}

impl StoreAdapter for Ica {
    fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn client(&self) -> &dyn JsonFetch {
        self.client.as_ref()
    }

    fn list_candidates(&self) -> Candidates {
        LISTS
    }

    fn normalize_record(&self, record: Record<'_>) -> OfferItem {
        let current = record.number(CURRENT_PRICE).unwrap_or(0.0);
        let original = record.number(ORIGINAL_PRICE).unwrap_or(0.0);

        let price = if current > 0.0 { format_kr(current) } else { String::new() };
        let original_price =
            if original > 0.0 && original != current { format_kr(original) } else { String::new() };

        let discount = match record.text(OFFER_TEXT) {
            Some(text) => text,
            None if original > current && current > 0.0 => {
                format!("Save {:.2} kr", original - current)
            }
            None => String::new(),
        };

        OfferItem {
            name: record.text_or(NAME, UNKNOWN_NAME),
            price_value: parse_price(price.as_str()),
            price,
            original_price,
            discount,
            description: record.text_or(&["/description"], ""),
            category: record.text_or(&["/category"], STORE_FALLBACK),
            brand: record.text_or(&["/brand"], STORE_FALLBACK),
            unit: record.text_or(UNIT, ""),
            image_url: record.text_or(IMAGE, ""),
            ..OfferItem::default()
        }
    }
}
