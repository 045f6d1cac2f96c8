use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Sentinel address of the central stock pool.
pub const MAIN_LOCATION: &str = "main";

/// Where stock lives: the single main pool or one sub-store, addressed by store id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Location {
    Main,
    Sub(String),
}

impl Location {
    pub fn parse(address: &str) -> Self {
        let address = address.trim();
        if address == MAIN_LOCATION {
            Location::Main
        } else {
            Location::Sub(address.to_string())
        }
    }

    pub fn sub(store_id: impl Into<String>) -> Self {
        Location::Sub(store_id.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Location::Main => MAIN_LOCATION,
            Location::Sub(id) => id,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Location {
    fn from(address: &str) -> Self {
        Location::parse(address)
    }
}

impl From<String> for Location {
    fn from(address: String) -> Self {
        Location::parse(&address)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        match location {
            Location::Main => MAIN_LOCATION.to_string(),
            Location::Sub(id) => id,
        }
    }
}

/// Quantity of one medicine in the main pool. At most one row per medicine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainStoreStock {
    pub id: String,
    pub medicine_id: String,
    pub quantity: u32,
    pub last_updated: DateTime<Utc>,
}

/// Quantity of one medicine in one sub-store. At most one row per (medicine, store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubStoreStock {
    pub id: String,
    pub medicine_id: String,
    pub store_id: String,
    pub quantity: u32,
    pub last_updated: DateTime<Utc>,
}
