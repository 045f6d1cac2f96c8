use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status. Deleting a medicine moves it to `Discontinued`; rows are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicineStatus {
    #[default]
    Active,
    Discontinued,
    Draft,
}

impl MedicineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicineStatus::Active => "active",
            MedicineStatus::Discontinued => "discontinued",
            MedicineStatus::Draft => "draft",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "active" => Some(MedicineStatus::Active),
            "discontinued" => Some(MedicineStatus::Discontinued),
            "draft" => Some(MedicineStatus::Draft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub category: String,
    /// e.g. "500mg"
    pub strength: String,
    pub brand: String,
    pub supplier: String,
    pub batch_no: String,
    pub expiry_date: Option<NaiveDate>,
    pub unit_cost: f64,
    pub selling_price: f64,
    /// Main-store quantity below which the medicine counts as low stock.
    pub safety_stock_level: u32,
    pub image_url: Option<String>,
    pub status: MedicineStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    pub fn from_draft(id: String, draft: MedicineDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            strength: draft.strength,
            brand: draft.brand,
            supplier: draft.supplier,
            batch_no: draft.batch_no,
            expiry_date: draft.expiry_date,
            unit_cost: draft.unit_cost,
            selling_price: draft.selling_price,
            safety_stock_level: draft.safety_stock_level,
            image_url: draft.image_url,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MedicineStatus::Active
    }

    /// Merges the fields present in `update`. Does not touch `updated_at`.
    pub fn apply(&mut self, update: MedicineUpdate) {
        let MedicineUpdate {
            name,
            category,
            strength,
            brand,
            supplier,
            batch_no,
            expiry_date,
            unit_cost,
            selling_price,
            safety_stock_level,
            image_url,
            status,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = category {
            self.category = v;
        }
        if let Some(v) = strength {
            self.strength = v;
        }
        if let Some(v) = brand {
            self.brand = v;
        }
        if let Some(v) = supplier {
            self.supplier = v;
        }
        if let Some(v) = batch_no {
            self.batch_no = v;
        }
        if let Some(v) = expiry_date {
            self.expiry_date = v;
        }
        if let Some(v) = unit_cost {
            self.unit_cost = v;
        }
        if let Some(v) = selling_price {
            self.selling_price = v;
        }
        if let Some(v) = safety_stock_level {
            self.safety_stock_level = v;
        }
        if let Some(v) = image_url {
            self.image_url = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = status {
            self.status = v;
        }
    }
}

/// Fields for a new medicine; id and timestamps are assigned on add.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDraft {
    pub name: String,
    pub category: String,
    pub strength: String,
    pub brand: String,
    pub supplier: String,
    pub batch_no: String,
    pub expiry_date: Option<NaiveDate>,
    pub unit_cost: f64,
    pub selling_price: f64,
    pub safety_stock_level: u32,
    pub image_url: Option<String>,
    pub status: MedicineStatus,
}

impl MedicineDraft {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn expiring_on(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    pub fn with_safety_stock(mut self, level: u32) -> Self {
        self.safety_stock_level = level;
        self
    }
}

/// A partial edit. `None` leaves the field unchanged; an empty `image_url` clears it,
/// as does `expiry_date: Some(None)` (`"expiryDate": null` on the wire).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub strength: Option<String>,
    pub brand: Option<String>,
    pub supplier: Option<String>,
    pub batch_no: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<Option<NaiveDate>>,
    pub unit_cost: Option<f64>,
    pub selling_price: Option<f64>,
    pub safety_stock_level: Option<u32>,
    pub image_url: Option<String>,
    pub status: Option<MedicineStatus>,
}

/// Distinguishes an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl MedicineUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
