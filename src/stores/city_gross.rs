//! City Gross weekly offers (Loop54 category API).

use super::envelope::{Candidates, Record};
use super::StoreAdapter;
use crate::client::JsonFetch;
use crate::config::StoreConfig;
use crate::models::{OfferItem, UNKNOWN_NAME};
use crate::price::{format_kr, parse_price};
use std::sync::Arc;

const LISTS: Candidates = &["/items", "/products", "/data/items", "/data/products"];

const CURRENT_PRICE: Candidates = &[
    "/productStoreDetails/prices/currentPrice/price",
    "/prices/currentPrice/price",
];
const PROMOTION_PRICE: Candidates = &[
    "/productStoreDetails/prices/activePromotion/price",
    "/productStoreDetails/prices/promotions/0/priceDetails/price",
    "/productStoreDetails/prices/promotions/0/price",
    "/prices/activePromotion/price",
];
const UNIT: Candidates = &[
    "/productStoreDetails/prices/currentPrice/unit",
    "/prices/currentPrice/unit",
];
const CATEGORY: Candidates = &["/superCategory", "/category"];
const IMAGE: Candidates = &["/images/0/url", "/imageUrl"];

/// City Gross adapter.
pub struct CityGross {
    config: StoreConfig,
    client: Arc<dyn JsonFetch>,
}

impl CityGross {
    pub fn new(config: StoreConfig, client: Arc<dyn JsonFetch>) -> Self {
        Self { config, client }
    }
}

impl StoreAdapter for CityGross {
    fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn client(&self) -> &dyn JsonFetch {
        self.client.as_ref()
    }

    fn list_candidates(&self) -> Candidates {
        LISTS
    }

    /// Selling price is the active promotion when there is one, otherwise the
    /// current price. The current price doubles as the original price.
    fn normalize_record(&self, record: Record<'_>) -> OfferItem {
        let current = record.number(CURRENT_PRICE).unwrap_or(0.0);
        let selling = record.number(PROMOTION_PRICE).unwrap_or(current);

        let price = if selling > 0.0 { format_kr(selling) } else { String::new() };

        let (original_price, discount) = if current > selling {
            (format_kr(current), format!("Save {:.2} kr", current - selling))
        } else {
            (String::new(), String::new())
        };

        OfferItem {
            name: record.text_or(&["/name"], UNKNOWN_NAME),
            price_value: parse_price(price.as_str()),
            price,
            original_price,
            discount,
            description: record.text_or(&["/description"], ""),
            category: record.text_or(CATEGORY, ""),
            brand: record.text_or(&["/brand"], ""),
            unit: record.text_or(UNIT, "st"),
            image_url: record.text_or(IMAGE, ""),
            ..OfferItem::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::testing::{adapter, MockFetch};
    use crate::stores::StoreId;
    use serde_json::{json, Value};

    fn product(name: &str, current: f64, promotion: Option<f64>) -> Value {
        let mut prices = json!({ "currentPrice": { "price": current, "unit": "kg" } });
        if let Some(promo) = promotion {
            prices["activePromotion"] = json!({ "price": promo });
        }
        json!({
            "name": name,
            "brand": "Arla",
            "superCategory": "Mejeri",
            "description": "Färsk mjölk",
            "productStoreDetails": { "prices": prices }
        })
    }

    fn normalize(payload: &Value) -> Vec<OfferItem> {
        adapter(StoreId::CityGross, MockFetch::new()).normalize(payload).unwrap()
    }

    #[test]
    fn test_promotion_synthesizes_discount() {
        let items = normalize(&json!({ "items": [product("Mjölk", 49.90, Some(39.90))] }));
        let item = &items[0];

        assert_eq!(item.name, "Mjölk");
        assert_eq!(item.price, "39.90 kr");
        assert_eq!(item.price_value, 39.90);
        assert_eq!(item.original_price, "49.90 kr");
        assert_eq!(item.discount, "Save 10.00 kr");
        assert_eq!(item.unit, "kg");
        assert_eq!(item.brand, "Arla");
        assert_eq!(item.category, "Mejeri");
        assert_eq!(item.description, "Färsk mjölk");
        assert_eq!(item.availability, "available");
    }

    #[test]
    fn test_no_promotion_uses_current_price() {
        let items = normalize(&json!({ "items": [product("Ost", 89.0, None)] }));
        let item = &items[0];

        assert_eq!(item.price, "89.00 kr");
        assert_eq!(item.price_value, 89.0);
        assert_eq!(item.original_price, "");
        assert_eq!(item.discount, "");
    }

    #[test]
    fn test_promotion_not_cheaper_has_no_discount() {
        let items = normalize(&json!({ "items": [product("Smör", 30.0, Some(35.0))] }));
        assert_eq!(items[0].price, "35.00 kr");
        assert_eq!(items[0].discount, "");
        assert_eq!(items[0].original_price, "");
    }

    #[test]
    fn test_promotions_array_fallback() {
        let payload = json!({ "items": [{
            "name": "Kaffe",
            "productStoreDetails": { "prices": {
                "currentPrice": { "price": 64.95 },
                "promotions": [{ "priceDetails": { "price": 49.95 } }]
            }}
        }]});

        let item = &normalize(&payload)[0];
        assert_eq!(item.price_value, 49.95);
        assert_eq!(item.discount, "Save 15.00 kr");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let item = &normalize(&json!({ "items": [{}] }))[0];

        assert_eq!(item.name, "Unknown");
        assert_eq!(item.price, "");
        assert_eq!(item.price_value, 0.0);
        assert_eq!(item.unit, "st");
        assert_eq!(item.brand, "");
        assert_eq!(item.image_url, "");
    }

    #[test]
    fn test_products_envelope_fallback() {
        let items = normalize(&json!({ "products": [product("Ägg", 32.0, None)] }));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Ägg");
    }

    #[test]
    fn test_cap_at_thirty() {
        let products: Vec<Value> =
            (0..45).map(|i| product(&format!("Vara {}", i), 10.0, None)).collect();
        let items = normalize(&json!({ "items": products }));

        assert_eq!(items.len(), 30);
        assert_eq!(items[29].name, "Vara 29");
    }

    #[test]
    fn test_normalize_is_repeatable() {
        let payload = json!({ "items": [product("A", 20.0, Some(15.0)), product("B", 5.0, None)] });
        assert_eq!(normalize(&payload), normalize(&payload));
    }
}
