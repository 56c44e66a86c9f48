//! Test doubles and helpers shared by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::FromRef,
    http::{header::CONTENT_TYPE, Request},
    response::Response,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use mongodb::bson::{oid::ObjectId, to_document, DateTime, Document};
use serde::Serialize;

use crate::config::TokenSecrets;
use crate::db::assigned_items::{AssignedItemFilter, AssignedItemStore, SharedAssignedItems};
use crate::db::operations::day_to_datetime;
use crate::db::records::{FieldFilter, RecordStore, SharedRecords};
use crate::db::users::{SharedUsers, UserStore};
use crate::error::StoreError;
use crate::structure::{
    assigned_items::AssignedItem, boats::Boat, inventory::InventoryItem, products::Product,
    users::User,
};
use crate::utils::cookies::CookieSettings;
use crate::utils::email::Mailer;
use crate::utils::jwt::TokenAuthority;

pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";

pub fn authority() -> Arc<TokenAuthority> {
    Arc::new(TokenAuthority::new(
        &TokenSecrets::new(ACCESS_SECRET, REFRESH_SECRET).unwrap(),
    ))
}

pub fn item(year: i32, month: u32, day: u32, archived: bool) -> AssignedItem {
    AssignedItem {
        id: ObjectId::new(),
        product_id: "p1".into(),
        boat_id: "b1".into(),
        quantity: 1,
        out_date: day_to_datetime(NaiveDate::from_ymd_opt(year, month, day).unwrap()),
        archived,
    }
}

/// In-memory assigned item store that counts writes and can fail them.
#[derive(Default)]
pub struct MemoryAssignedItems {
    items: Mutex<Vec<AssignedItem>>,
    fail_updates: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryAssignedItems {
    pub fn new(items: Vec<AssignedItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<AssignedItem> {
        self.items.lock().unwrap().clone()
    }

    pub fn get(&self, id: ObjectId) -> Option<AssignedItem> {
        self.snapshot().into_iter().find(|item| item.id == id)
    }

    fn set_archived(&self, id: ObjectId, archived: bool) -> Result<bool, StoreError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::NotFound(id));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.archived = archived;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AssignedItemStore for MemoryAssignedItems {
    async fn list(&self, filter: &AssignedItemFilter) -> Result<Vec<AssignedItem>, StoreError> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect())
    }

    async fn mark_archived(&self, id: ObjectId) -> Result<(), StoreError> {
        match self.set_archived(id, true)? {
            true => Ok(()),
            false => Err(StoreError::NotFound(id)),
        }
    }

    async fn insert(&self, item: &AssignedItem) -> Result<(), StoreError> {
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }

    async fn unarchive(&self, id: ObjectId) -> Result<bool, StoreError> {
        self.set_archived(id, false)
    }
}

pub fn user(email: &str, name: &str) -> User {
    User {
        id: ObjectId::new(),
        email: email.into(),
        name: name.into(),
        otp_hash: None,
        otp_expires_at: None,
    }
}

/// In-memory user accounts.
#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<User>>,
}

impl MemoryUsers {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    pub fn get(&self, id: ObjectId) -> Option<User> {
        self.snapshot().into_iter().find(|user| user.id == id)
    }

    fn update(&self, id: ObjectId, apply: impl FnOnce(&mut User)) {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            apply(user);
        }
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.snapshot().into_iter().find(|user| user.email == email))
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.get(id))
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn set_otp(
        &self,
        id: ObjectId,
        otp_hash: &str,
        expires_at: DateTime,
    ) -> Result<(), StoreError> {
        self.update(id, |user| {
            user.otp_hash = Some(otp_hash.to_string());
            user.otp_expires_at = Some(expires_at);
        });
        Ok(())
    }

    async fn clear_otp(&self, id: ObjectId) -> Result<(), StoreError> {
        self.update(id, |user| {
            user.otp_hash = None;
            user.otp_expires_at = None;
        });
        Ok(())
    }
}

/// In-memory catalogue records, matched through their BSON form the way
/// MongoDB would see them.
pub struct MemoryRecords<T> {
    records: Mutex<Vec<T>>,
}

impl<T: Clone + Serialize> MemoryRecords<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.records.lock().unwrap().clone()
    }
}

fn bson_of<T: Serialize>(record: &T) -> Document {
    to_document(record).unwrap()
}

#[async_trait]
impl<T> RecordStore<T> for MemoryRecords<T>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    async fn list(&self, filter: Option<&FieldFilter>) -> Result<Vec<T>, StoreError> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|record| {
                filter.is_none_or(|f| {
                    bson_of(record)
                        .get_str(f.field)
                        .is_ok_and(|value| value == f.value)
                })
            })
            .collect())
    }

    async fn insert(&self, record: &T) -> Result<(), StoreError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| bson_of(record).get_object_id("_id").ok() != Some(id));
        Ok(records.len() != before)
    }
}

/// Router state for handler tests; no database behind it.
#[derive(Clone)]
pub struct TestState {
    pub users: SharedUsers,
    pub assigned_items: SharedAssignedItems,
    pub products: SharedRecords<Product>,
    pub inventory: SharedRecords<InventoryItem>,
    pub boats: SharedRecords<Boat>,
    pub tokens: Arc<TokenAuthority>,
    pub cookies: CookieSettings,
    pub mailer: Option<Mailer>,
}

impl Default for TestState {
    fn default() -> Self {
        Self {
            users: Arc::new(MemoryUsers::default()),
            assigned_items: Arc::new(MemoryAssignedItems::default()),
            products: Arc::new(MemoryRecords::<Product>::new(vec![])),
            inventory: Arc::new(MemoryRecords::<InventoryItem>::new(vec![])),
            boats: Arc::new(MemoryRecords::<Boat>::new(vec![])),
            tokens: authority(),
            cookies: CookieSettings::default(),
            mailer: None,
        }
    }
}

impl TestState {
    pub fn new(store: Arc<MemoryAssignedItems>) -> Self {
        Self {
            assigned_items: store,
            ..Self::default()
        }
    }

    pub fn bearer(&self, user_id: &str) -> String {
        format!("Bearer {}", self.tokens.create_access_token(user_id).unwrap())
    }
}

impl FromRef<TestState> for SharedUsers {
    fn from_ref(state: &TestState) -> Self {
        state.users.clone()
    }
}

impl FromRef<TestState> for SharedAssignedItems {
    fn from_ref(state: &TestState) -> Self {
        state.assigned_items.clone()
    }
}

impl FromRef<TestState> for SharedRecords<Product> {
    fn from_ref(state: &TestState) -> Self {
        state.products.clone()
    }
}

impl FromRef<TestState> for SharedRecords<InventoryItem> {
    fn from_ref(state: &TestState) -> Self {
        state.inventory.clone()
    }
}

impl FromRef<TestState> for SharedRecords<Boat> {
    fn from_ref(state: &TestState) -> Self {
        state.boats.clone()
    }
}

impl FromRef<TestState> for Arc<TokenAuthority> {
    fn from_ref(state: &TestState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<TestState> for CookieSettings {
    fn from_ref(state: &TestState) -> Self {
        state.cookies
    }
}

impl FromRef<TestState> for Option<Mailer> {
    fn from_ref(state: &TestState) -> Self {
        state.mailer.clone()
    }
}

pub fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    axum::http::Request::builder().method(method).uri(uri)
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    request(method, uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
