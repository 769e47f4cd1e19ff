//! Store API health check.

use crate::client::{HttpClient, JsonFetch};
use crate::commands::offers::OfferService;
use crate::config::{Config, OutputFormat};
use crate::stores::{StoreAdapter, StoreId};
use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Health of one store API.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    pub store_id: StoreId,
    pub store_name: String,
    pub reachable: bool,
    pub item_count: usize,
    pub elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health of every configured store.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub stores: Vec<StoreHealth>,
}

impl HealthReport {
    /// Number of stores that answered with valid JSON.
    pub fn reachable_count(&self) -> usize {
        self.stores.iter().filter(|s| s.reachable).count()
    }
}

/// Probes a single store once and times it.
async fn probe(adapter: &dyn StoreAdapter) -> StoreHealth {
    let started = Instant::now();
    let result = adapter.fetch().await;
    let elapsed_ms = started.elapsed().as_millis();

    StoreHealth {
        store_id: result.store_id,
        store_name: result.store_name,
        reachable: result.error.is_none(),
        item_count: result.item_count,
        elapsed_ms,
        error: result.error,
    }
}

/// Checks every store API concurrently.
pub async fn check_stores(adapters: &[Arc<dyn StoreAdapter>]) -> HealthReport {
    let stores = join_all(adapters.iter().map(|a| probe(a.as_ref()))).await;
    HealthReport { stores }
}

/// Runs the health check and renders it.
pub struct CheckCommand {
    config: Config,
}

impl CheckCommand {
    /// Creates a new check command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the check against the live store APIs.
    pub async fn execute(&self) -> Result<String> {
        let client = HttpClient::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_client(Arc::new(client)).await
    }

    /// Executes the check with a provided transport (for testing).
    ///
    /// Fails only when no store is reachable.
    pub async fn execute_with_client(&self, client: Arc<dyn JsonFetch>) -> Result<String> {
        let service = OfferService::with_client(&self.config, client);
        let report = check_stores(service.adapters()).await;

        for store in report.stores.iter().filter(|s| !s.reachable) {
            warn!(
                "{} API is not accessible: {}",
                store.store_name,
                store.error.as_deref().unwrap_or("")
            );
        }
        info!("{} of {} store APIs reachable", report.reachable_count(), report.stores.len());

        if report.reachable_count() == 0 {
            anyhow::bail!("No store API is reachable:\n{}", format_health(&report));
        }

        Ok(match self.config.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)?,
            _ => format_health(&report),
        })
    }
}

/// Formats a health report as a table.
fn format_health(report: &HealthReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{:<12} {:<10} {:>6} {:>8}  {}",
        "Store", "Status", "Items", "Time", "Detail"
    ));
    lines.push("-".repeat(60));

    for store in &report.stores {
        let status = if store.reachable { "OK" } else { "FAIL" };
        lines.push(format!(
            "{:<12} {:<10} {:>6} {:>6}ms  {}",
            store.store_name,
            status,
            store.item_count,
            store.elapsed_ms,
            store.error.as_deref().unwrap_or("")
        ));
    }

    lines.push(String::new());
    lines.push(format!("{}/{} stores reachable", report.reachable_count(), report.stores.len()));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::testing::MockFetch;
    use serde_json::json;

    #[tokio::test]
    async fn test_check_partial_outage() {
        let mock = MockFetch::new()
            .fail(StoreId::CityGross)
            .respond(StoreId::Willys, json!({ "results": [{ "name": "a" }] }))
            .respond(StoreId::Ica, json!({ "data": [] }));

        let output = CheckCommand::new(Config::default())
            .execute_with_client(Arc::new(mock))
            .await
            .unwrap();

        assert!(output.contains("City Gross"));
        assert!(output.contains("FAIL"));
        assert!(output.contains("2/3 stores reachable"));
    }

    #[tokio::test]
    async fn test_check_all_down_is_error() {
        let mock =
            MockFetch::new().fail(StoreId::CityGross).fail(StoreId::Willys).fail(StoreId::Ica);

        let err = CheckCommand::new(Config::default())
            .execute_with_client(Arc::new(mock))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("No store API is reachable"));
    }

    #[tokio::test]
    async fn test_check_json_output() {
        let mock = MockFetch::new()
            .respond(StoreId::CityGross, json!({ "items": [] }))
            .fail(StoreId::Willys)
            .fail(StoreId::Ica);
        let config = Config { format: OutputFormat::Json, ..Config::default() };

        let output = CheckCommand::new(config).execute_with_client(Arc::new(mock)).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["stores"][0]["store_id"], "citygross");
        assert_eq!(value["stores"][0]["reachable"], true);
        assert_eq!(value["stores"][1]["reachable"], false);
        assert!(value["stores"][0].get("error").is_none());
    }
}
