//! Willys campaign offers (offline campaign search API).

use super::envelope::{Candidates, Record};
use super::StoreAdapter;
use crate::client::JsonFetch;
use crate::config::StoreConfig;
use crate::models::{OfferItem, UNKNOWN_NAME};
use crate::price::parse_price;
use std::sync::Arc;

const LISTS: Candidates = &["/results", "/data/results", "/products", "/items"];

const PROMOTION: &str = "/potentialPromotions/0";
const PROMOTION_PRICE: Candidates = &[
    "/potentialPromotions/0/price/formattedValue",
    "/potentialPromotions/0/price/value",
    "/potentialPromotions/0/price",
];
const SAVE_LABEL: Candidates = &["/potentialPromotions/0/savePrice"];
const LIMIT_LABEL: Candidates = &["/potentialPromotions/0/redeemLimitLabel"];
const CATEGORY: Candidates = &["/googleAnalyticsCategory", "/category"];
const IMAGE: Candidates = &["/image/url", "/thumbnail/url", "/imageUrl"];

/// Separator between the savings and redemption-limit labels.
const LABEL_SEPARATOR: &str = " • ";

/// Willys adapter.
pub struct Willys {
    config: StoreConfig,
    client: Arc<dyn JsonFetch>,
}

impl Willys {
    pub fn new(config: StoreConfig, client: Arc<dyn JsonFetch>) -> Self {
        Self { config, client }
    }
}

fn with_unit(amount: &str, unit: &str) -> String {
    if unit.is_empty() {
        amount.to_string()
    } else {
        format!("{} {}", amount, unit)
    }
}

impl StoreAdapter for Willys {
    fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn client(&self) -> &dyn JsonFetch {
        self.client.as_ref()
    }

    fn list_candidates(&self) -> Candidates {
        LISTS
    }

    /// Promotion prices replace the shelf price. The shelf price is kept as the
    /// original only when the promotion's price text differs from it.
    fn normalize_record(&self, record: Record<'_>) -> OfferItem {
        let unit = record.text_or(&["/priceUnit"], "");
        let current = record.text_or(&["/priceNoUnit"], "");
        let current_display =
            record.text(&["/price"]).unwrap_or_else(|| with_unit(&current, &unit));

        let promotion_price =
            record.has(&[PROMOTION]).then(|| record.text(PROMOTION_PRICE)).flatten();

        let (price, price_value, original_price) = match promotion_price {
            Some(promo) => {
                let original = if promo != current { current_display } else { String::new() };
                (with_unit(&promo, &unit), parse_price(promo.as_str()), original)
            }
            None => (current_display, parse_price(current.as_str()), String::new()),
        };

        let discount = match (record.text(SAVE_LABEL), record.text(LIMIT_LABEL)) {
            (Some(save), Some(limit)) => format!("{}{}{}", save, LABEL_SEPARATOR, limit),
            (Some(label), None) | (None, Some(label)) => label,
            (None, None) => String::new(),
        };

        OfferItem {
            name: record.text_or(&["/name"], UNKNOWN_NAME),
            price,
            price_value,
            original_price,
            discount,
            description: record.text_or(&["/displayVolume"], ""),
            category: record.text_or(CATEGORY, ""),
            brand: record.text_or(&["/manufacturer"], ""),
            unit,
            image_url: record.text_or(IMAGE, ""),
            ..OfferItem::default()
        }
    }
}
