use std::sync::Arc;

use axum::extract::FromRef;
use mongodb::Database;

use crate::db::{
    assigned_items::{MongoAssignedItems, SharedAssignedItems},
    records::{MongoRecords, SharedRecords},
    users::{MongoUsers, SharedUsers},
    Collections,
};
use crate::structure::{boats::Boat, inventory::InventoryItem, products::Product};
use crate::utils::{cookies::CookieSettings, email::Mailer, jwt::TokenAuthority};

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub users: SharedUsers,
    pub assigned_items: SharedAssignedItems,
    pub products: SharedRecords<Product>,
    pub inventory: SharedRecords<InventoryItem>,
    pub boats: SharedRecords<Boat>,
    pub tokens: Arc<TokenAuthority>,
    pub cookies: CookieSettings,
    pub mailer: Option<Mailer>,
}

impl AppState {
    pub fn new(
        db: Database,
        tokens: TokenAuthority,
        cookies: CookieSettings,
        mailer: Option<Mailer>,
    ) -> Self {
        Self {
            users: Arc::new(MongoUsers::new(&db)),
            assigned_items: Arc::new(MongoAssignedItems::new(&db)),
            products: Arc::new(MongoRecords::new(&db, Collections::PRODUCTS)),
            inventory: Arc::new(MongoRecords::new(&db, Collections::INVENTORY)),
            boats: Arc::new(MongoRecords::new(&db, Collections::BOATS)),
            tokens: Arc::new(tokens),
            cookies,
            mailer,
        }
    }
}

impl FromRef<AppState> for SharedUsers {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for SharedAssignedItems {
    fn from_ref(state: &AppState) -> Self {
        state.assigned_items.clone()
    }
}

impl FromRef<AppState> for SharedRecords<Product> {
    fn from_ref(state: &AppState) -> Self {
        state.products.clone()
    }
}

impl FromRef<AppState> for SharedRecords<InventoryItem> {
    fn from_ref(state: &AppState) -> Self {
        state.inventory.clone()
    }
}

impl FromRef<AppState> for SharedRecords<Boat> {
    fn from_ref(state: &AppState) -> Self {
        state.boats.clone()
    }
}

impl FromRef<AppState> for Arc<TokenAuthority> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for CookieSettings {
    fn from_ref(state: &AppState) -> Self {
        state.cookies
    }
}

impl FromRef<AppState> for Option<Mailer> {
    fn from_ref(state: &AppState) -> Self {
        state.mailer.clone()
    }
}
