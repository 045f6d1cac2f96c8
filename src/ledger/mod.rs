//! Per-(medicine, location) quantities over the two stock tables.
//!
//! Every write is guarded: the row (or its absence) observed by [`StockLedger::slot`] must
//! still hold when [`StockLedger::commit`] writes, else the commit fails with
//! [`StoreError::Conflict`] and nothing is written. The `lastUpdated` cell changes on
//! every commit, so any intervening write is detected.

use crate::codec::SheetRow;
use crate::model::{new_id, Location, MainStoreStock, SubStoreStock};
use crate::repository::{Record, Repository};
use crate::store::{SharedStore, StoreError};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The backing row of a slot as it was read.
#[derive(Debug, Clone, PartialEq)]
enum Backing {
    Main(Record<MainStoreStock>),
    Sub(Record<SubStoreStock>),
    Absent,
}

/// The quantity held for one medicine at one location, plus what is needed to write it
/// back safely.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSlot {
    pub medicine_id: String,
    pub location: Location,
    pub quantity: u32,
    backing: Backing,
}

impl StockSlot {
    /// Whether a stock row exists yet. Rows are created lazily on first write.
    pub fn exists(&self) -> bool {
        self.backing != Backing::Absent
    }
}

/// All quantities of one medicine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineStock {
    pub main: u32,
    pub subs: BTreeMap<String, u32>,
}

impl MedicineStock {
    pub fn total(&self) -> u64 {
        self.main as u64 + self.subs.values().map(|q| *q as u64).sum::<u64>()
    }
}

#[derive(Clone)]
pub struct StockLedger {
    main: Repository<MainStoreStock>,
    subs: Repository<SubStoreStock>,
}

impl StockLedger {
    pub fn new(store: SharedStore) -> Self {
        Self {
            main: Repository::new(store.clone()),
            subs: Repository::new(store),
        }
    }

    /// Reads the current slot for (`medicine_id`, `location`). Matches are found over the
    /// full table so the record index is the row's real position.
    pub async fn slot(&self, medicine_id: &str, location: &Location) -> Result<StockSlot, StoreError> {
        let (quantity, backing) = match location {
            Location::Main => match self.main.find_by(|s| s.medicine_id == medicine_id).await? {
                Some(record) => (record.entity.quantity, Backing::Main(record)),
                None => (0, Backing::Absent),
            },
            Location::Sub(store_id) => match self
                .subs
                .find_by(|s| s.medicine_id == medicine_id && &s.store_id == store_id)
                .await?
            {
                Some(record) => (record.entity.quantity, Backing::Sub(record)),
                None => (0, Backing::Absent),
            },
        };

        Ok(StockSlot {
            medicine_id: medicine_id.to_string(),
            location: location.clone(),
            quantity,
            backing,
        })
    }

    /// Quantity at a location; 0 when no stock row exists.
    pub async fn get_quantity(&self, medicine_id: &str, location: &Location) -> Result<u32, StoreError> {
        Ok(self.slot(medicine_id, location).await?.quantity)
    }

    /// Writes `quantity` into the row behind `slot`, or appends a row if it had none.
    ///
    /// Fails with [`StoreError::Conflict`] when the row changed (or appeared) since `slot`
    /// was read.
    pub async fn commit(&self, slot: &StockSlot, quantity: u32) -> Result<(), StoreError> {
        let now = Utc::now();
        match &slot.backing {
            Backing::Main(record) => {
                let mut row = record.entity.clone();
                row.quantity = quantity;
                row.last_updated = now;
                self.main
                    .replace_at_if_unchanged(record.index, &record.cells, &row)
                    .await?;
            }
            Backing::Sub(record) => {
                let mut row = record.entity.clone();
                row.quantity = quantity;
                row.last_updated = now;
                self.subs
                    .replace_at_if_unchanged(record.index, &record.cells, &row)
                    .await?;
            }
            Backing::Absent => {
                let current = self.slot(&slot.medicine_id, &slot.location).await?;
                if current.exists() {
                    return Err(StoreError::conflict(conflict_key(slot)));
                }
                match &slot.location {
                    Location::Main => {
                        self.main
                            .append(&MainStoreStock {
                                id: new_id(),
                                medicine_id: slot.medicine_id.clone(),
                                quantity,
                                last_updated: now,
                            })
                            .await?;
                    }
                    Location::Sub(store_id) => {
                        self.subs
                            .append(&SubStoreStock {
                                id: new_id(),
                                medicine_id: slot.medicine_id.clone(),
                                store_id: store_id.clone(),
                                quantity,
                                last_updated: now,
                            })
                            .await?;
                    }
                }
                debug!(medicine_id = %slot.medicine_id, location = %slot.location, "Stock row created");
            }
        }

        info!(
            medicine_id = %slot.medicine_id,
            location = %slot.location,
            from = slot.quantity,
            to = quantity,
            "Stock set"
        );
        Ok(())
    }

    /// Reads then commits. Returns the previous quantity.
    pub async fn set_quantity(
        &self,
        medicine_id: &str,
        location: &Location,
        quantity: u32,
    ) -> Result<u32, StoreError> {
        let slot = self.slot(medicine_id, location).await?;
        self.commit(&slot, quantity).await?;
        Ok(slot.quantity)
    }

    /// Main and per-sub-store quantities of one medicine.
    pub async fn medicine_stock(&self, medicine_id: &str) -> Result<MedicineStock, StoreError> {
        let (main, subs) = tokio::try_join!(self.main.list(), self.subs.list())?;
        Ok(stock_of(medicine_id, &main, &subs))
    }
}

fn conflict_key(slot: &StockSlot) -> String {
    let table = match slot.location {
        Location::Main => MainStoreStock::TABLE,
        Location::Sub(_) => SubStoreStock::TABLE,
    };
    format!("{table} ({} @ {})", slot.medicine_id, slot.location)
}

/// Quantities of one medicine from already-fetched stock tables. The first row per
/// location wins.
pub fn stock_of(medicine_id: &str, main: &[MainStoreStock], subs: &[SubStoreStock]) -> MedicineStock {
    let main_quantity = main
        .iter()
        .find(|s| s.medicine_id == medicine_id)
        .map(|s| s.quantity)
        .unwrap_or(0);

    let mut by_store = BTreeMap::new();
    for row in subs.iter().filter(|s| s.medicine_id == medicine_id) {
        by_store.entry(row.store_id.clone()).or_insert(row.quantity);
    }

    MedicineStock {
        main: main_quantity,
        subs: by_store,
    }
}
