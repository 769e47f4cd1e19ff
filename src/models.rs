//! Unified offer schema shared by every store.

use crate::stores::StoreId;
use serde::{Deserialize, Serialize};

/// Availability value emitted for every normalized offer.
pub const AVAILABLE: &str = "available";

/// Placeholder name for offers the upstream left unnamed.
pub const UNKNOWN_NAME: &str = "Unknown";

/// One promotional product, normalized across stores.
///
/// Every field is always present; missing upstream data becomes an empty
/// string or a store-specific fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferItem {
    /// Display name
    pub name: String,
    /// Formatted selling price, possibly with currency and unit suffix
    pub price: String,
    /// Parsed magnitude of the selling price in kronor
    pub price_value: f64,
    /// Formatted pre-discount price, empty when not discounted
    pub original_price: String,
    /// Human-readable savings description, empty when none
    pub discount: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub unit: String,
    /// Product image URL, empty when absent
    pub image_url: String,
    pub availability: String,
}

impl Default for OfferItem {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            price: String::new(),
            price_value: 0.0,
            original_price: String::new(),
            discount: String::new(),
            description: String::new(),
            category: String::new(),
            brand: String::new(),
            unit: String::new(),
            image_url: String::new(),
            availability: AVAILABLE.to_string(),
        }
    }
}

impl OfferItem {
    /// Returns true if the offer carries a discount description.
    pub fn is_discounted(&self) -> bool {
        !self.discount.is_empty() || !self.original_price.is_empty()
    }
}

/// Outcome of fetching one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreResult {
    pub store_name: String,
    pub store_id: StoreId,
    pub items: Vec<OfferItem>,
    /// Always equal to `items.len()`
    pub item_count: usize,
    /// Set only when the store-level fetch failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Upstream URL that was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Diagnostic about the upstream response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StoreResult {
    /// Creates a successful result holding the given items.
    pub fn with_items(
        store_name: impl Into<String>,
        store_id: StoreId,
        items: Vec<OfferItem>,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            store_id,
            item_count: items.len(),
            items,
            error: None,
            source_url: None,
            note: None,
        }
    }

    /// Creates a failed result with no items.
    pub fn failed(
        store_name: impl Into<String>,
        store_id: StoreId,
        error: impl Into<String>,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            store_id,
            items: Vec::new(),
            item_count: 0,
            error: Some(error.into()),
            source_url: None,
            note: None,
        }
    }

    /// Records the upstream URL that produced this result.
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Attaches a diagnostic note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns true if the store could not be fetched.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Combined report over all configured stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// One result per store, in configured order
    pub stores: Vec<StoreResult>,
    /// Sum of every store's `item_count`
    pub total_items: usize,
}

impl AggregateReport {
    /// Builds a report and computes the item total.
    pub fn new(stores: Vec<StoreResult>) -> Self {
        let total_items = stores.iter().map(|s| s.item_count).sum();
        Self { stores, total_items }
    }

    /// Looks up a store's result by id.
    pub fn store(&self, id: StoreId) -> Option<&StoreResult> {
        self.stores.iter().find(|s| s.store_id == id)
    }

    /// Number of stores that failed to fetch.
    pub fn failed_count(&self) -> usize {
        self.stores.iter().filter(|s| s.is_error()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> OfferItem {
        OfferItem { name: name.to_string(), ..OfferItem::default() }
    }

    #[test]
    fn test_offer_item_default_fields_present() {
        let offer = OfferItem::default();
        assert_eq!(offer.name, "Unknown");
        assert_eq!(offer.availability, "available");

        let json = serde_json::to_value(&offer).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "name",
            "price",
            "price_value",
            "original_price",
            "discount",
            "description",
            "category",
            "brand",
            "unit",
            "image_url",
            "availability",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
            assert!(!obj[key].is_null(), "null {}", key);
        }
    }

    #[test]
    fn test_is_discounted() {
        let mut offer = item("Mjölk");
        assert!(!offer.is_discounted());
        offer.discount = "Spara 5 kr".to_string();
        assert!(offer.is_discounted());
    }

    #[test]
    fn test_store_result_with_items_counts() {
        let result =
            StoreResult::with_items("Willys", StoreId::Willys, vec![item("a"), item("b")]);
        assert_eq!(result.item_count, 2);
        assert!(!result.is_error());
    }

    #[test]
    fn test_store_result_failed_is_empty() {
        let result = StoreResult::failed("ICA", StoreId::Ica, "connection refused")
            .with_source_url("https://example.test/api");
        assert!(result.items.is_empty());
        assert_eq!(result.item_count, 0);
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert_eq!(result.source_url.as_deref(), Some("https://example.test/api"));
    }

    #[test]
    fn test_store_result_error_omitted_when_absent() {
        let result = StoreResult::with_items("ICA", StoreId::Ica, Vec::new());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("note").is_none());
        assert_eq!(json["store_id"], "ica");
        assert_eq!(json["item_count"], 0);
    }

    #[test]
    fn test_aggregate_report_totals() {
        let report = AggregateReport::new(vec![
            StoreResult::failed("City Gross", StoreId::CityGross, "timeout"),
            StoreResult::with_items("Willys", StoreId::Willys, vec![item("a"), item("b")]),
            StoreResult::with_items("ICA", StoreId::Ica, vec![item("c")]),
        ]);

        assert_eq!(report.total_items, 3);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.store(StoreId::Ica).unwrap().item_count, 1);
    }
}
