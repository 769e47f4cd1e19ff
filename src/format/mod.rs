//! Output formatting for offer reports (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::models::{AggregateReport, OfferItem, StoreResult};
use serde::Serialize;

const NAME_WIDTH: usize = 40;
const PRICE_WIDTH: usize = 14;
const DISCOUNT_WIDTH: usize = 28;

/// Error body returned in place of a store result.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Formats store results and reports.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single store's result.
    pub fn format_store(&self, result: &StoreResult) -> String {
        match self.format {
            OutputFormat::Json => json(result),
            OutputFormat::Table => self.table_store(result),
            OutputFormat::Markdown => self.markdown_store(result),
            OutputFormat::Csv => {
                let mut lines = vec![csv_header()];
                lines.extend(csv_rows(result));
                lines.join("\n")
            }
        }
    }

    /// Formats the combined report over all stores.
    pub fn format_report(&self, report: &AggregateReport) -> String {
        match self.format {
            OutputFormat::Json => json(report),
            OutputFormat::Csv => {
                let mut lines = vec![csv_header()];
                for store in &report.stores {
                    lines.extend(csv_rows(store));
                }
                lines.join("\n")
            }
            OutputFormat::Table | OutputFormat::Markdown => {
                let mut sections: Vec<String> =
                    report.stores.iter().map(|s| self.format_store(s)).collect();
                sections.push(match self.format {
                    OutputFormat::Markdown => format!("**Total: {} offers**", report.total_items),
                    _ => format!("Total: {} offers", report.total_items),
                });
                sections.join("\n\n")
            }
        }
    }

    /// Formats a caller-visible error.
    pub fn format_error(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => json(&ErrorBody { error: message }),
            _ => format!("Error: {}", message),
        }
    }

    // Table formatting

    fn table_store(&self, result: &StoreResult) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{} ({})", result.store_name, result.store_id));
        lines.push("=".repeat(NAME_WIDTH + PRICE_WIDTH * 2 + DISCOUNT_WIDTH + 6));

        if let Some(error) = &result.error {
            lines.push(format!("Error: {}", error));
            return lines.join("\n");
        }

        if result.items.is_empty() {
            lines.push("No offers found.".to_string());
            return lines.join("\n");
        }

        lines.push(format!(
            "{:<NAME_WIDTH$}  {:>PRICE_WIDTH$}  {:>PRICE_WIDTH$}  {}",
            "Name", "Price", "Was", "Discount"
        ));
        lines.push(format!(
            "{:-<NAME_WIDTH$}  {:-<PRICE_WIDTH$}  {:-<PRICE_WIDTH$}  {:-<DISCOUNT_WIDTH$}",
            "", "", "", ""
        ));

        for item in &result.items {
            lines.push(format!(
                "{:<NAME_WIDTH$}  {:>PRICE_WIDTH$}  {:>PRICE_WIDTH$}  {}",
                truncate(&item.name, NAME_WIDTH),
                truncate(&display_price(item), PRICE_WIDTH),
                truncate(&item.original_price, PRICE_WIDTH),
                truncate(&item.discount, DISCOUNT_WIDTH)
            ));
        }

        lines.push(String::new());
        lines.push(format!("{} offers, {} discounted", result.item_count, discounted(result)));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_store(&self, result: &StoreResult) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", result.store_name));
        lines.push(String::new());

        if let Some(error) = &result.error {
            lines.push(format!("> Error: {}", error));
            return lines.join("\n");
        }

        if result.items.is_empty() {
            lines.push("*No offers found.*".to_string());
            return lines.join("\n");
        }

        lines.push("| Name | Price | Was | Discount | Brand |".to_string());
        lines.push("|------|-------|-----|----------|-------|".to_string());

        for item in &result.items {
            let was = if item.original_price.is_empty() {
                String::new()
            } else {
                format!("~~{}~~", item.original_price)
            };

            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                markdown_escape(&item.name),
                markdown_escape(&display_price(item)),
                markdown_escape(&was),
                markdown_escape(&item.discount),
                markdown_escape(&item.brand)
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} offers, {} discounted*", result.item_count, discounted(result)));

        lines.join("\n")
    }
}

fn discounted(result: &StoreResult) -> usize {
    result.items.iter().filter(|item| item.is_discounted()).count()
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Uses the formatted price, falling back to the parsed value.
fn display_price(item: &OfferItem) -> String {
    if item.price.is_empty() && item.price_value > 0.0 {
        format!("{:.2}", item.price_value)
    } else {
        item.price.clone()
    }
}

/// Truncates on character boundaries, marking cut text with "...".
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn markdown_escape(s: &str) -> String {
    s.replace('|', "\\|")
}

// CSV formatting

fn csv_header() -> String {
    "store,name,price,price_value,original_price,discount,brand,category,unit,description".to_string()
}

fn csv_rows(result: &StoreResult) -> Vec<String> {
    result
        .items
        .iter()
        .map(|item| {
            let price_value = item.price_value.to_string();
            [
                result.store_id.as_str(),
                item.name.as_str(),
                item.price.as_str(),
                price_value.as_str(),
                item.original_price.as_str(),
                item.discount.as_str(),
                item.brand.as_str(),
                item.category.as_str(),
                item.unit.as_str(),
                item.description.as_str(),
            ]
            .iter()
            .map(|field| csv_escape(field))
            .collect::<Vec<_>>()
            .join(",")
        })
        .collect()
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::StoreId;

    fn make_item() -> OfferItem {
        OfferItem {
            name: "Färsk kycklingfilé".to_string(),
            price: "89,90 kr/kg".to_string(),
            price_value: 89.90,
            original_price: "119,00 kr/kg".to_string(),
            discount: "Spara 29 kr • Max 2 köp".to_string(),
            brand: "Kronfågel".to_string(),
            category: "Kött".to_string(),
            unit: "kr/kg".to_string(),
            ..OfferItem::default()
        }
    }

    fn make_result() -> StoreResult {
        StoreResult::with_items("Willys", StoreId::Willys, vec![make_item()])
    }

    #[test]
    fn test_json_store() {
        let output = Formatter::new(OutputFormat::Json).format_store(&make_result());
        let parsed: StoreResult = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.items[0].name, "Färsk kycklingfilé");
        assert!(!output.contains("\"error\""));
    }

    #[test]
    fn test_json_report() {
        let report = AggregateReport::new(vec![
            make_result(),
            StoreResult::failed("ICA", StoreId::Ica, "timed out"),
        ]);
        let output = Formatter::new(OutputFormat::Json).format_report(&report);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["total_items"], 1);
        assert_eq!(value["stores"][1]["error"], "timed out");
    }

    #[test]
    fn test_json_error() {
        let output = Formatter::new(OutputFormat::Json).format_error("Store 'Coop' not supported");
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "Store 'Coop' not supported" }));
    }

    #[test]
    fn test_table_store() {
        let output = Formatter::new(OutputFormat::Table).format_store(&make_result());
        assert!(output.contains("Willys (willys)"));
        assert!(output.contains("Färsk kycklingfilé"));
        assert!(output.contains("89,90 kr/kg"));
        assert!(output.contains("1 offers, 1 discounted"));
    }

    #[test]
    fn test_table_store_error() {
        let result = StoreResult::failed("City Gross", StoreId::CityGross, "HTTP 503");
        let output = Formatter::new(OutputFormat::Table).format_store(&result);
        assert!(output.contains("Error: HTTP 503"));
    }

    #[test]
    fn test_table_report_total() {
        let report = AggregateReport::new(vec![make_result()]);
        let output = Formatter::new(OutputFormat::Table).format_report(&report);
        assert!(output.ends_with("Total: 1 offers"));
    }

    #[test]
    fn test_markdown_store() {
        let output = Formatter::new(OutputFormat::Markdown).format_store(&make_result());
        assert!(output.starts_with("## Willys"));
        assert!(output.contains("~~119,00 kr/kg~~"));
        assert!(output.contains("| Kronfågel |"));
    }

    #[test]
    fn test_markdown_counts_discounted_offers() {
        let plain = OfferItem { name: "Salt".to_string(), ..OfferItem::default() };
        let result = StoreResult::with_items("Willys", StoreId::Willys, vec![make_item(), plain]);

        let output = Formatter::new(OutputFormat::Markdown).format_store(&result);
        assert!(output.ends_with("*2 offers, 1 discounted*"));
    }

    #[test]
    fn test_markdown_empty_store() {
        let result = StoreResult::with_items("ICA", StoreId::Ica, Vec::new());
        let output = Formatter::new(OutputFormat::Markdown).format_store(&result);
        assert!(output.contains("*No offers found.*"));
    }

    #[test]
    fn test_csv_report() {
        let report = AggregateReport::new(vec![make_result()]);
        let output = Formatter::new(OutputFormat::Csv).format_report(&report);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("store,name,price"));
        assert!(lines[1].starts_with("willys,Färsk kycklingfilé,\"89,90 kr/kg\",89.9,"));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Ärtsoppa", 20), "Ärtsoppa");
        assert_eq!(truncate("Äppelmos från Skåne", 8), "Äppel...");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_display_price_fallback() {
        let item = OfferItem { price_value: 12.5, ..OfferItem::default() };
        assert_eq!(display_price(&item), "12.50");
    }
}
