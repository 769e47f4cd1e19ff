//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::client::HttpMethod;
use crate::stores::StoreId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Browser User-Agent sent to every store.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Connection timeout shared by all stores, in milliseconds
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,

    /// Request timeout applied to every store without its own override
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Request timeout from the environment or CLI, beats every file setting
    #[serde(skip)]
    pub timeout_override_ms: Option<u64>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Per-store overrides
    #[serde(default)]
    pub stores: StoreOverrides,
}

/// Override tables keyed by store id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreOverrides {
    #[serde(default)]
    pub citygross: StoreOverride,
    #[serde(default)]
    pub willys: StoreOverride,
    #[serde(default)]
    pub ica: StoreOverride,
}

impl StoreOverrides {
    fn get(&self, store: StoreId) -> &StoreOverride {
        match store {
            StoreId::CityGross => &self.citygross,
            StoreId::Willys => &self.willys,
            StoreId::Ica => &self.ica,
        }
    }
}

/// Optional settings layered over a store's built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreOverride {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub max_items: Option<usize>,
    /// Merged over the default query parameters
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// Merged over the default headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Fully resolved settings for one store. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub store: StoreId,
    pub name: String,
    pub base_url: String,
    pub path: String,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// JSON request body, sent only with POST
    pub body: Option<String>,
    pub timeout_ms: u64,
    pub max_items: usize,
}

const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

impl StoreConfig {
    /// Returns the built-in endpoint settings for a store.
    pub fn defaults(store: StoreId) -> Self {
        match store {
            StoreId::CityGross => Self {
                store,
                name: store.display_name().to_string(),
                base_url: "https://www.citygross.se".to_string(),
                path: "/api/v1/Loop54/category/2930/products".to_string(),
                method: HttpMethod::Get,
                query: pairs(&[
                    ("categoryName", "Veckans erbjudanden"),
                    ("currentWeekDiscountOnly", "true"),
                    ("skip", "0"),
                    ("take", "50"),
                ]),
                headers: pairs(&[
                    ("User-Agent", USER_AGENT),
                    ("Accept", "application/json"),
                    ("Referer", "https://www.citygross.se/"),
                ]),
                body: None,
                timeout_ms: DEFAULT_TIMEOUT_MS,
                max_items: 30,
            },
            StoreId::Willys => Self {
                store,
                name: store.display_name().to_string(),
                base_url: "https://www.willys.se".to_string(),
                path: "/search/campaigns/offline".to_string(),
                method: HttpMethod::Get,
                query: pairs(&[
                    ("q", "2258"),
                    ("type", "PERSONAL_GENERAL"),
                    ("page", "0"),
                    ("size", "50"),
                ]),
                headers: pairs(&[
                    ("User-Agent", USER_AGENT),
                    ("Accept", "application/json"),
                    ("Referer", "https://www.willys.se/"),
                ]),
                body: None,
                timeout_ms: DEFAULT_TIMEOUT_MS,
                max_items: 25,
            },
            StoreId::Ica => Self {
                store,
                name: store.display_name().to_string(),
                base_url: "https://apimgw-pub.ica.se".to_string(),
                path: "/sverige/digx/productapi/v1/assortment".to_string(),
                method: HttpMethod::Post,
                query: pairs(&[("accountNumber", "1004579"), ("channel", "online")]),
                headers: pairs(&[
                    ("User-Agent", USER_AGENT),
                    ("Accept", "application/json"),
                    ("Content-Type", "application/json"),
                    ("Referer", "https://www.ica.se/erbjudanden/ica-supermarket-sundbyberg-1004579/"),
                    ("Origin", "https://www.ica.se"),
                ]),
                body: Some("{}".to_string()),
                timeout_ms: DEFAULT_TIMEOUT_MS,
                max_items: 25,
            },
        }
    }

    /// Returns the full request URL with encoded query parameters.
    pub fn url(&self) -> String {
        let mut url = format!("{}{}", self.base_url.trim_end_matches('/'), self.path);

        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }

        url
    }

    fn apply(&mut self, overrides: &StoreOverride) {
        if let Some(base_url) = &overrides.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(path) = &overrides.path {
            self.path = path.clone();
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(max_items) = overrides.max_items {
            self.max_items = max_items;
        }
        merge_pairs(&mut self.query, &overrides.query);
        merge_pairs(&mut self.headers, &overrides.headers);
    }
}

/// Replaces matching keys in place and appends new ones.
fn merge_pairs(target: &mut Vec<(String, String)>, overrides: &BTreeMap<String, String>) {
    for (key, value) in overrides {
        match target.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(existing) => existing.1 = value.clone(),
            None => target.push((key.clone(), value.clone())),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("grocery-offers.toml");
        if local_config.exists() {
            debug!("Found grocery-offers.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("grocery-offers").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("GROCERY_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(timeout) = std::env::var("GROCERY_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.timeout_override_ms = Some(t);
            }
        }

        if let Ok(format) = std::env::var("GROCERY_FORMAT") {
            if let Ok(f) = format.parse() {
                self.format = f;
            }
        }

        self
    }

    /// Forces one request timeout on every store.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_override_ms = Some(timeout_ms);
        self
    }

    /// Connection timeout for the shared HTTP client.
    pub fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS)
    }

    /// Resolves the settings handed to a store adapter.
    pub fn store(&self, store: StoreId) -> StoreConfig {
        let mut config = StoreConfig::defaults(store);
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        config.apply(self.stores.get(store));
        if let Some(timeout_ms) = self.timeout_override_ms {
            config.timeout_ms = timeout_ms;
        }
        config
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
