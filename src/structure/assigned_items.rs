use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::operations::{datetime_to_day, day_to_datetime, parse_day};
use crate::utils::serialize_datetime_as_iso_string;

/// An inventory unit issued to a boat on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedItem {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub product_id: String,
    pub boat_id: String,
    pub quantity: i64,
    pub out_date: DateTime,
    /// One-way under the archive sweep; only an explicit unarchive resets it.
    pub archived: bool,
}

impl AssignedItem {
    /// Calendar day (UTC) the item left inventory.
    pub fn out_day(&self) -> Option<NaiveDate> {
        datetime_to_day(self.out_date)
    }
}

#[derive(Debug, Serialize)]
pub struct AssignedItemResponse {
    pub id: String,
    pub product_id: String,
    pub boat_id: String,
    pub quantity: i64,
    #[serde(serialize_with = "serialize_datetime_as_iso_string")]
    pub out_date: DateTime,
    pub archived: bool,
}

impl From<AssignedItem> for AssignedItemResponse {
    fn from(item: AssignedItem) -> Self {
        AssignedItemResponse {
            id: item.id.to_hex(),
            product_id: item.product_id,
            boat_id: item.boat_id,
            quantity: item.quantity,
            out_date: item.out_date,
            archived: item.archived,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewAssignedItem {
    pub product_id: String,
    pub boat_id: String,
    pub quantity: i64,
    /// `YYYY-MM-DD`
    pub out_date: String,
}

impl NewAssignedItem {
    pub fn into_item(self) -> Result<AssignedItem, &'static str> {
        if self.product_id.trim().is_empty() {
            return Err("product_id is required");
        }
        if self.boat_id.trim().is_empty() {
            return Err("boat_id is required");
        }
        if self.quantity <= 0 {
            return Err("quantity must be positive");
        }
        let day = parse_day(&self.out_date).ok_or("out_date must be YYYY-MM-DD")?;

        Ok(AssignedItem {
            id: ObjectId::new(),
            product_id: self.product_id,
            boat_id: self.boat_id,
            quantity: self.quantity,
            out_date: day_to_datetime(day),
            archived: false,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignedItemQuery {
    pub archived: Option<bool>,
    pub boat_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product_id: String,
    pub total_quantity: i64,
    pub items: usize,
}

#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub products: Vec<ProductSummary>,
}

impl MonthlySummary {
    /// Totals per product, ordered by product id. A total that would exceed
    /// `i64::MAX` is reported as `i64::MAX`.
    pub fn from_items(year: i32, month: u32, items: &[AssignedItem]) -> Self {
        let mut totals: BTreeMap<&str, (i64, usize)> = BTreeMap::new();
        for item in items {
            let entry = totals.entry(item.product_id.as_str()).or_default();
            entry.0 = entry.0.saturating_add(item.quantity);
            entry.1 += 1;
        }

        MonthlySummary {
            year,
            month,
            products: totals
                .into_iter()
                .map(|(product_id, (total_quantity, items))| ProductSummary {
                    product_id: product_id.to_string(),
                    total_quantity,
                    items,
                })
                .collect(),
        }
    }
}
