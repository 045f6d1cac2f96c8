//! Row codec: fixed column layouts mapping store rows to entities and back.
//!
//! Decoding never fails. Malformed numbers read as 0, missing text as empty, missing ids
//! as fresh ids, missing timestamps as now. Free text is kept as stored, padding included;
//! ids, numbers, dates and enum names are read trimmed. For a well-formed entity (ids
//! without surrounding whitespace, optional text never blank), `decode(encode(e)) == e`.

mod cells;

use crate::model::{
    AuditKind, MainStoreStock, Medicine, MedicineStatus, Role, Store, StoreKind, SubStoreStock,
    Transaction, User,
};
use crate::store::Row;
use cells::{date_cell, json_cell, optional_cell, timestamp_cell, Cells};

/// An entity stored one-per-row in a named table.
pub trait SheetRow: Clone + Send + Sync + 'static {
    /// Table (sheet tab) name.
    const TABLE: &'static str;
    /// Header names, in column order. Also fixes the row width.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;

    fn decode(row: &[String]) -> Self;

    fn encode(&self) -> Row;

    fn header() -> Row {
        Self::COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn width() -> usize {
        Self::COLUMNS.len()
    }
}

impl SheetRow for Medicine {
    const TABLE: &'static str = "Medicines";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "category",
        "strength",
        "brand",
        "supplier",
        "batchNo",
        "expiryDate",
        "unitCost",
        "sellingPrice",
        "safetyStockLevel",
        "imageUrl",
        "status",
        "createdAt",
        "updatedAt",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(row: &[String]) -> Self {
        let c = Cells(row);
        Medicine {
            id: c.id(0),
            name: c.text(1),
            category: c.text(2),
            strength: c.text(3),
            brand: c.text(4),
            supplier: c.text(5),
            batch_no: c.text(6),
            expiry_date: c.date(7),
            unit_cost: c.number(8),
            selling_price: c.number(9),
            safety_stock_level: c.quantity(10),
            image_url: c.optional(11),
            status: MedicineStatus::from_name(&c.text(12)).unwrap_or_default(),
            created_at: c.timestamp(13),
            updated_at: c.timestamp(14),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.clone(),
            self.strength.clone(),
            self.brand.clone(),
            self.supplier.clone(),
            self.batch_no.clone(),
            date_cell(&self.expiry_date),
            self.unit_cost.to_string(),
            self.selling_price.to_string(),
            self.safety_stock_level.to_string(),
            optional_cell(&self.image_url),
            self.status.as_str().to_string(),
            timestamp_cell(&self.created_at),
            timestamp_cell(&self.updated_at),
        ]
    }
}

impl SheetRow for Store {
    const TABLE: &'static str = "Stores";
    const COLUMNS: &'static [&'static str] = &["id", "name", "type", "location", "createdAt"];

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(row: &[String]) -> Self {
        let c = Cells(row);
        Store {
            id: c.id(0),
            name: c.text(1),
            kind: StoreKind::from_name(&c.text(2)).unwrap_or_default(),
            location: c.optional(3),
            created_at: c.timestamp(4),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.kind.as_str().to_string(),
            optional_cell(&self.location),
            timestamp_cell(&self.created_at),
        ]
    }
}

impl SheetRow for MainStoreStock {
    const TABLE: &'static str = "MainStore_Stock";
    const COLUMNS: &'static [&'static str] = &["id", "medicineId", "quantity", "lastUpdated"];

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(row: &[String]) -> Self {
        let c = Cells(row);
        MainStoreStock {
            id: c.id(0),
            medicine_id: c.key(1),
            quantity: c.quantity(2),
            last_updated: c.timestamp(3),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.id.clone(),
            self.medicine_id.clone(),
            self.quantity.to_string(),
            timestamp_cell(&self.last_updated),
        ]
    }
}

impl SheetRow for SubStoreStock {
    const TABLE: &'static str = "SubStores_Stock";
    const COLUMNS: &'static [&'static str] =
        &["id", "medicineId", "storeId", "quantity", "lastUpdated"];

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(row: &[String]) -> Self {
        let c = Cells(row);
        SubStoreStock {
            id: c.id(0),
            medicine_id: c.key(1),
            store_id: c.key(2),
            quantity: c.quantity(3),
            last_updated: c.timestamp(4),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.id.clone(),
            self.medicine_id.clone(),
            self.store_id.clone(),
            self.quantity.to_string(),
            timestamp_cell(&self.last_updated),
        ]
    }
}

impl SheetRow for Transaction {
    const TABLE: &'static str = "Transactions";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "type",
        "medicineId",
        "entity",
        "oldValues",
        "newValues",
        "userId",
        "description",
        "createdAt",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(row: &[String]) -> Self {
        let c = Cells(row);
        Transaction {
            id: c.id(0),
            kind: AuditKind::from_name(&c.text(1)),
            medicine_id: c.optional(2),
            entity: c.json(3),
            old_values: c.json(4),
            new_values: c.json(5),
            user_id: c.key(6),
            description: c.text(7),
            created_at: c.timestamp(8),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.id.clone(),
            self.kind.as_str().to_string(),
            optional_cell(&self.medicine_id),
            json_cell(&self.entity),
            json_cell(&self.old_values),
            json_cell(&self.new_values),
            self.user_id.clone(),
            self.description.clone(),
            timestamp_cell(&self.created_at),
        ]
    }
}

impl SheetRow for User {
    const TABLE: &'static str = "Users";
    const COLUMNS: &'static [&'static str] =
        &["id", "email", "name", "role", "phone", "storeId", "createdAt"];

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(row: &[String]) -> Self {
        let c = Cells(row);
        User {
            id: c.id(0),
            email: c.text(1),
            name: c.text(2),
            role: Role::from_name(&c.text(3)).unwrap_or_default(),
            phone: c.optional(4),
            store_id: c.optional(5),
            created_at: c.timestamp(6),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.id.clone(),
            self.email.clone(),
            self.name.clone(),
            self.role.as_str().to_string(),
            optional_cell(&self.phone),
            optional_cell(&self.store_id),
            timestamp_cell(&self.created_at),
        ]
    }
}
