//! Supported grocery stores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three upstream stores, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreId {
    #[serde(rename = "citygross")]
    CityGross,
    Willys,
    Ica,
}

impl StoreId {
    /// Returns the display name used in reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            StoreId::CityGross => "City Gross",
            StoreId::Willys => "Willys",
            StoreId::Ica => "ICA",
        }
    }

    /// Returns the stable identifier used in reports and config keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreId::CityGross => "citygross",
            StoreId::Willys => "willys",
            StoreId::Ica => "ica",
        }
    }

    /// Resolves a free-text store name by case-insensitive substring match.
    ///
    /// Checked in fixed priority order: City Gross, Willys, ICA.
    pub fn resolve(name: &str) -> Option<StoreId> {
        let name = name.to_lowercase();

        if name.contains("city gross") || name.contains("citygross") {
            Some(StoreId::CityGross)
        } else if name.contains("willys") {
            Some(StoreId::Willys)
        } else if name.contains("ica") {
            Some(StoreId::Ica)
        } else {
            None
        }
    }

    /// Returns all stores in report order.
    pub fn all() -> &'static [StoreId] {
        &[StoreId::CityGross, StoreId::Willys, StoreId::Ica]
    }

    /// Comma-separated display names of every supported store.
    pub fn supported_names() -> String {
        Self::all().iter().map(|s| s.display_name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "citygross" | "city-gross" | "cg" => Ok(StoreId::CityGross),
            "willys" => Ok(StoreId::Willys),
            "ica" => Ok(StoreId::Ica),
            _ => Err(format!("Unknown store: {}. Use: citygross, willys, ica", s)),
        }
    }
}
