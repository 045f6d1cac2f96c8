//! Read-side rollups over a snapshot. Pure functions of their inputs and the clock
//! value passed in; nothing is cached.

use crate::model::{MainStoreStock, Medicine, MedicineStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Days from `today` until `expiry`; negative once expired.
pub fn days_until_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// Expiry band by whole days remaining: `< 0` expired, `0..=29` expiring,
/// `30..=60` warning, beyond that normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    Expiring,
    Warning,
    Normal,
}

impl ExpiryStatus {
    pub fn classify(expiry: NaiveDate, today: NaiveDate) -> Self {
        match days_until_expiry(expiry, today) {
            d if d < 0 => ExpiryStatus::Expired,
            0..=29 => ExpiryStatus::Expiring,
            30..=60 => ExpiryStatus::Warning,
            _ => ExpiryStatus::Normal,
        }
    }

    /// Medicines without an expiry date are treated as normal.
    pub fn of(medicine: &Medicine, today: NaiveDate) -> Self {
        medicine
            .expiry_date
            .map(|date| Self::classify(date, today))
            .unwrap_or(ExpiryStatus::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Critical,
    Low,
    Normal,
}

impl StockStatus {
    /// Critical when empty or under half the safety level, low under the safety level.
    pub fn classify(current: u32, safety_level: u32) -> Self {
        if current == 0 || (current as u64) * 2 < safety_level as u64 {
            StockStatus::Critical
        } else if current < safety_level {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }
}

/// Active medicines per expiry band. The bands are disjoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExpiryBreakdown {
    pub expired: usize,
    pub expiring: usize,
    pub warning: usize,
    pub normal: usize,
}

impl ExpiryBreakdown {
    fn count(&mut self, status: ExpiryStatus) {
        match status {
            ExpiryStatus::Expired => self.expired += 1,
            ExpiryStatus::Expiring => self.expiring += 1,
            ExpiryStatus::Warning => self.warning += 1,
            ExpiryStatus::Normal => self.normal += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Active medicines.
    pub total_medicines: usize,
    pub low_stock_count: usize,
    pub expired_count: usize,
    /// Expiring within 60 days: `expiry.expiring + expiry.warning`.
    pub expiring_count: usize,
    pub total_transactions: usize,
    pub last_sync: Option<DateTime<Utc>>,
    pub expiry: ExpiryBreakdown,
}

/// Main-store quantity of `medicine_id`; 0 without a stock row.
pub fn main_quantity(medicine_id: &str, main_stock: &[MainStoreStock]) -> u32 {
    main_stock
        .iter()
        .find(|s| s.medicine_id == medicine_id)
        .map(|s| s.quantity)
        .unwrap_or(0)
}

impl DashboardStats {
    /// Rollups over active medicines. Activity totals start empty; see
    /// [`with_activity`](Self::with_activity).
    pub fn compute(medicines: &[Medicine], main_stock: &[MainStoreStock], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut expiry = ExpiryBreakdown::default();
        let mut total = 0;
        let mut low = 0;

        for medicine in medicines.iter().filter(|m| m.is_active()) {
            total += 1;
            if main_quantity(&medicine.id, main_stock) < medicine.safety_stock_level {
                low += 1;
            }
            expiry.count(ExpiryStatus::of(medicine, today));
        }

        Self {
            total_medicines: total,
            low_stock_count: low,
            expired_count: expiry.expired,
            expiring_count: expiry.expiring + expiry.warning,
            total_transactions: 0,
            last_sync: None,
            expiry,
        }
    }

    pub fn with_activity(mut self, total_transactions: usize, last_sync: Option<DateTime<Utc>>) -> Self {
        self.total_transactions = total_transactions;
        self.last_sync = last_sync;
        self
    }
}

/// Client-side medicine filter for list screens. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicineFilter {
    /// Case-insensitive substring of name, brand or category.
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<MedicineStatus>,
    pub expiry: Option<ExpiryStatus>,
    pub stock: Option<StockStatus>,
}

impl MedicineFilter {
    pub fn matches(&self, medicine: &Medicine, main_quantity: u32, today: NaiveDate) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [&medicine.name, &medicine.brand, &medicine.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &medicine.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if medicine.status != status {
                return false;
            }
        }
        if let Some(expiry) = self.expiry {
            if ExpiryStatus::of(medicine, today) != expiry {
                return false;
            }
        }
        if let Some(stock) = self.stock {
            if StockStatus::classify(main_quantity, medicine.safety_stock_level) != stock {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(
        &self,
        medicines: &'a [Medicine],
        main_stock: &[MainStoreStock],
        now: DateTime<Utc>,
    ) -> Vec<&'a Medicine> {
        let today = now.date_naive();
        medicines
            .iter()
            .filter(|m| self.matches(m, main_quantity(&m.id, main_stock), today))
            .collect()
    }
}
