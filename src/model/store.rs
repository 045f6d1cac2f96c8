use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Main,
    #[default]
    Sub,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Main => "main",
            StoreKind::Sub => "sub",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "main" => Some(StoreKind::Main),
            "sub" => Some(StoreKind::Sub),
            _ => None,
        }
    }
}

/// A stock location. Provisioned out of band and read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StoreKind,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}
