//! Declarative lookup of product lists and fields inside store responses.
//!
//! Every lookup is an ordered list of JSON Pointer candidates (RFC 6901). The
//! first candidate that resolves wins, so store-specific fallbacks stay data
//! rather than nested conditionals. `""` is the document root.

use serde_json::Value;

/// Ordered JSON Pointer candidates.
pub type Candidates = &'static [&'static str];

/// Returns the first candidate list that resolves to an array.
///
/// `None` means the response shape was not recognised.
pub fn locate_list<'a>(payload: &'a Value, candidates: &[&str]) -> Option<&'a [Value]> {
    candidates
        .iter()
        .find_map(|pointer| payload.pointer(pointer).and_then(Value::as_array))
        .map(Vec::as_slice)
}

/// Returns the first candidate value that is present and not `null`.
pub fn first_present<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().find_map(|pointer| record.pointer(pointer).filter(|v| !v.is_null()))
}

/// Read-only view over one product record.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    value: &'a Value,
}

impl<'a> Record<'a> {
    /// Wraps a list element; non-object elements are not records.
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(|_| Self { value })
    }

    /// Returns the value at the first present candidate.
    pub fn get(&self, candidates: &[&str]) -> Option<&'a Value> {
        first_present(self.value, candidates)
    }

    /// Returns text at the first present candidate.
    ///
    /// Numbers and booleans are rendered to text; empty strings count as absent.
    pub fn text(&self, candidates: &[&str]) -> Option<String> {
        candidates.iter().find_map(|pointer| match self.value.pointer(pointer)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Returns text at the first present candidate, or `default`.
    pub fn text_or(&self, candidates: &[&str], default: &str) -> String {
        self.text(candidates).unwrap_or_else(|| default.to_string())
    }

    /// Returns a number at the first present candidate.
    ///
    /// Numeric strings go through the price parser, so "29,90" reads as 29.90.
    pub fn number(&self, candidates: &[&str]) -> Option<f64> {
        candidates.iter().find_map(|pointer| match self.value.pointer(pointer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if s.chars().any(|c| c.is_ascii_digit()) => {
                Some(crate::price::parse_price(s.as_str()))
            }
            _ => None,
        })
    }

    /// Returns true if any candidate is present and not `null`.
    pub fn has(&self, candidates: &[&str]) -> bool {
        self.get(candidates).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LISTS: Candidates = &["/data/products", "/data/items", "/data", "/items", ""];

    #[test]
    fn test_locate_list_priority() {
        let payload = json!({
            "data": { "items": [1, 2], "products": [3] },
            "items": [4, 5, 6]
        });
        assert_eq!(locate_list(&payload, LISTS).unwrap(), &[json!(3)]);
    }

    #[test]
    fn test_locate_list_skips_non_arrays() {
        let payload = json!({ "data": { "meta": {} }, "items": [1] });
        assert_eq!(locate_list(&payload, LISTS).unwrap(), &[json!(1)]);
    }

    #[test]
    fn test_locate_list_data_as_list() {
        let payload = json!({ "data": [{"name": "a"}] });
        assert_eq!(locate_list(&payload, LISTS).unwrap().len(), 1);
    }

    #[test]
    fn test_locate_list_root_as_list() {
        let payload = json!([{"name": "a"}, {"name": "b"}]);
        assert_eq!(locate_list(&payload, LISTS).unwrap().len(), 2);
    }

    #[test]
    fn test_locate_list_unrecognised_shape() {
        assert!(locate_list(&json!({"status": "ok"}), LISTS).is_none());
        assert!(locate_list(&json!(null), LISTS).is_none());
    }

    #[test]
    fn test_first_present_ignores_null() {
        let record = json!({ "a": null, "b": 2 });
        assert_eq!(first_present(&record, &["/a", "/b"]), Some(&json!(2)));
        assert_eq!(first_present(&record, &["/c"]), None);
    }

    #[test]
    fn test_record_rejects_non_objects() {
        assert!(Record::new(&json!("text")).is_none());
        assert!(Record::new(&json!(42)).is_none());
        assert!(Record::new(&json!(null)).is_none());
        assert!(Record::new(&json!([])).is_none());
        assert!(Record::new(&json!({})).is_some());
    }

    #[test]
    fn test_record_text() {
        let value = json!({ "name": "  Mjölk ", "empty": "", "qty": 3, "nested": { "x": "y" } });
        let record = Record::new(&value).unwrap();

        assert_eq!(record.text(&["/name"]).as_deref(), Some("Mjölk"));
        assert_eq!(record.text(&["/empty", "/qty"]).as_deref(), Some("3"));
        assert_eq!(record.text(&["/nested/x"]).as_deref(), Some("y"));
        assert_eq!(record.text(&["/nested"]), None);
        assert_eq!(record.text_or(&["/missing"], "fallback"), "fallback");
    }

    #[test]
    fn test_record_number() {
        let value = json!({ "a": 12.5, "b": "29,90 kr", "c": "n/a", "d": [{"p": 7}] });
        let record = Record::new(&value).unwrap();

        assert_eq!(record.number(&["/a"]), Some(12.5));
        assert_eq!(record.number(&["/b"]), Some(29.90));
        assert_eq!(record.number(&["/c", "/d/0/p"]), Some(7.0));
        assert_eq!(record.number(&["/missing"]), None);
        assert!(record.has(&["/d"]));
    }
}
