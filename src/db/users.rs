use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime},
    Collection, Database,
};

use super::{get_collection, Collections};
use crate::error::StoreError;
use crate::structure::users::User;

/// Persistence for user accounts and their pending login codes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` is expected already normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError>;

    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    /// Replaces any code already pending for the user.
    async fn set_otp(
        &self,
        id: ObjectId,
        otp_hash: &str,
        expires_at: DateTime,
    ) -> Result<(), StoreError>;

    async fn clear_otp(&self, id: ObjectId) -> Result<(), StoreError>;
}

pub type SharedUsers = Arc<dyn UserStore>;

pub struct MongoUsers {
    coll: Collection<User>,
}

impl MongoUsers {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: get_collection(db, Collections::USERS),
        }
    }
}

#[async_trait]
impl UserStore for MongoUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.coll.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.coll.find_one(doc! { "_id": id }).await?)
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.coll.insert_one(user).await?;
        Ok(())
    }

    async fn set_otp(
        &self,
        id: ObjectId,
        otp_hash: &str,
        expires_at: DateTime,
    ) -> Result<(), StoreError> {
        let update = doc! {
            "$set": {
                "otp_hash": otp_hash,
                "otp_expires_at": expires_at,
            }
        };
        self.coll.update_one(doc! { "_id": id }, update).await?;
        Ok(())
    }

    async fn clear_otp(&self, id: ObjectId) -> Result<(), StoreError> {
        let clear = doc! { "$unset": { "otp_hash": "", "otp_expires_at": "" } };
        self.coll.update_one(doc! { "_id": id }, clear).await?;
        Ok(())
    }
}
