use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::db::operations::{day_to_datetime, parse_day};
use crate::utils::serialize_datetime_as_iso_string;

/// Stock received into the warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub product_id: String,
    pub quantity: i64,
    pub received_date: DateTime,
}

#[derive(Debug, Serialize)]
pub struct InventoryItemResponse {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    #[serde(serialize_with = "serialize_datetime_as_iso_string")]
    pub received_date: DateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewInventoryItem {
    pub product_id: String,
    pub quantity: i64,
    pub received_date: String,
}

impl NewInventoryItem {
    pub fn into_item(self) -> Result<InventoryItem, &'static str> {
        if self.product_id.trim().is_empty() {
            return Err("product_id is required");
        }
        if self.quantity <= 0 {
            return Err("quantity must be positive");
        }
        let day = parse_day(&self.received_date).ok_or("received_date must be YYYY-MM-DD")?;
        Ok(InventoryItem {
            id: ObjectId::new(),
            product_id: self.product_id,
            quantity: self.quantity,
            received_date: day_to_datetime(day),
        })
    }
}

impl From<InventoryItem> for InventoryItemResponse {
    fn from(item: InventoryItem) -> Self {
        InventoryItemResponse {
            id: item.id.to_hex(),
            product_id: item.product_id,
            quantity: item.quantity,
            received_date: item.received_date,
        }
    }
}
