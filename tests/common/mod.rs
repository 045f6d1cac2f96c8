#![allow(dead_code)]

use chrono::{Duration, Utc};
use medstock::codec::SheetRow;
use medstock::config::InventoryConfig;
use medstock::model::{
    MainStoreStock, Medicine, MedicineDraft, Role, Store, StoreKind, SubStoreStock, User,
};
use medstock::store::MemoryRowStore;
use medstock::InventorySystem;
use std::sync::Arc;

pub const M1: &str = "m1";
pub const S1: &str = "s1";
pub const S2: &str = "s2";
pub const KEEPER: &str = "u1";
pub const KEEPER_EMAIL: &str = "keeper@clinic.org";

pub fn medicine(id: &str, name: &str, safety: u32, expires_in_days: i64) -> Medicine {
    let expiry = Utc::now().date_naive() + Duration::days(expires_in_days);
    Medicine::from_draft(
        id.to_string(),
        MedicineDraft::new(name, "General")
            .with_safety_stock(safety)
            .expiring_on(expiry),
        Utc::now(),
    )
}

fn table<T: SheetRow>(entities: &[T]) -> Vec<Vec<String>> {
    std::iter::once(T::header())
        .chain(entities.iter().map(SheetRow::encode))
        .collect()
}

/// M1 (safety 20, expiring in a year) with `main_quantity` in main; sub-stores S1, S2;
/// one storekeeper.
pub fn seeded_store(main_quantity: u32) -> Arc<MemoryRowStore> {
    seeded_store_with(vec![medicine(M1, "Paracetamol", 20, 365)], main_quantity)
}

pub fn seeded_store_with(medicines: Vec<Medicine>, main_quantity: u32) -> Arc<MemoryRowStore> {
    let now = Utc::now();
    let stores = vec![
        Store {
            id: "main-store".into(),
            name: "Central".into(),
            kind: StoreKind::Main,
            location: None,
            created_at: now,
        },
        Store {
            id: S1.into(),
            name: "Ward 1".into(),
            kind: StoreKind::Sub,
            location: Some("Block A".into()),
            created_at: now,
        },
        Store {
            id: S2.into(),
            name: "Outpatient".into(),
            kind: StoreKind::Sub,
            location: None,
            created_at: now,
        },
    ];
    let main_stock: Vec<MainStoreStock> = medicines
        .iter()
        .map(|m| MainStoreStock {
            id: format!("stock-{}", m.id),
            medicine_id: m.id.clone(),
            quantity: main_quantity,
            last_updated: now,
        })
        .collect();
    let users = vec![User {
        id: KEEPER.into(),
        email: KEEPER_EMAIL.into(),
        name: "Store Keeper".into(),
        role: Role::Storekeeper,
        phone: None,
        store_id: Some(S1.into()),
        created_at: now,
    }];

    Arc::new(
        MemoryRowStore::new()
            .with_table(Medicine::TABLE, table(&medicines))
            .with_table(Store::TABLE, table(&stores))
            .with_table(MainStoreStock::TABLE, table(&main_stock))
            .with_table(SubStoreStock::TABLE, vec![SubStoreStock::header()])
            .with_table(User::TABLE, table(&users)),
    )
}

pub async fn start(store: Arc<MemoryRowStore>) -> InventorySystem {
    medstock::lifecycle::setup_tracing();
    let system = InventorySystem::start(store, &InventoryConfig::default());
    system
        .refresh_all_data()
        .await
        .expect("initial refresh");
    system
}
