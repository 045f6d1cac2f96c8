use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt::{self, Display};

/// What kind of mutation an audit entry records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditKind {
    MedicineAdded,
    MedicineEdited,
    MedicineDeleted,
    StockTransfer,
    StockDeduction,
    StockAdjustment,
    Login,
    Logout,
    /// A type name this crate does not know, kept verbatim.
    Other(String),
}

impl AuditKind {
    pub fn as_str(&self) -> &str {
        match self {
            AuditKind::MedicineAdded => "medicine_added",
            AuditKind::MedicineEdited => "medicine_edited",
            AuditKind::MedicineDeleted => "medicine_deleted",
            AuditKind::StockTransfer => "stock_transfer",
            AuditKind::StockDeduction => "stock_deduction",
            AuditKind::StockAdjustment => "stock_adjustment",
            AuditKind::Login => "login",
            AuditKind::Logout => "logout",
            AuditKind::Other(name) => name,
        }
    }

    /// Parses a stored type name. An empty cell reads as `medicine_added`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "" | "medicine_added" => AuditKind::MedicineAdded,
            "medicine_edited" => AuditKind::MedicineEdited,
            "medicine_deleted" => AuditKind::MedicineDeleted,
            "stock_transfer" => AuditKind::StockTransfer,
            "stock_deduction" => AuditKind::StockDeduction,
            "stock_adjustment" => AuditKind::StockAdjustment,
            "login" => AuditKind::Login,
            "logout" => AuditKind::Logout,
            other => AuditKind::Other(other.to_string()),
        }
    }
}

impl Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: AuditKind,
    pub medicine_id: Option<String>,
    /// The data affected, as JSON.
    pub entity: Option<Value>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub user_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
