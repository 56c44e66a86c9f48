use mongodb::{Client, Collection, Database};

use crate::config::Constants;

pub mod assigned_items;
pub mod operations;
pub mod records;
pub mod users;

/// Collection names.
pub struct Collections;

impl Collections {
    pub const ASSIGNED_ITEMS: &'static str = "AssignedItems";
    pub const BOATS: &'static str = "Boats";
    pub const INVENTORY: &'static str = "InventoryItems";
    pub const PRODUCTS: &'static str = "Products";
    pub const USERS: &'static str = "Users";
}

/// Connect to MongoDB and open the application database
pub async fn connect(db_url: &str) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(db_url).await?;
    Ok(client.database(Constants::DB_NAME))
}

/// Get a collection from the database
pub fn get_collection<T: Send + Sync>(db: &Database, name: &str) -> Collection<T> {
    db.collection(name)
}
