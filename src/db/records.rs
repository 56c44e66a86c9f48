use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, Database,
};
use serde::{de::DeserializeOwned, Serialize};

use super::{get_collection, operations::find_all};
use crate::error::StoreError;

/// Equality match on one string field, e.g. inventory by `product_id`.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: &'static str,
    pub value: String,
}

impl FieldFilter {
    fn to_document(filter: Option<&FieldFilter>) -> Document {
        let mut document = doc! {};
        if let Some(filter) = filter {
            document.insert(filter.field, filter.value.as_str());
        }
        document
    }
}

/// Plain list/insert/delete persistence for catalogue records
/// (products, inventory items, boats).
#[async_trait]
pub trait RecordStore<T: Send + Sync + 'static>: Send + Sync {
    async fn list(&self, filter: Option<&FieldFilter>) -> Result<Vec<T>, StoreError>;

    async fn insert(&self, record: &T) -> Result<(), StoreError>;

    /// `false` when no record has this id.
    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError>;
}

pub type SharedRecords<T> = Arc<dyn RecordStore<T>>;

pub struct MongoRecords<T: Send + Sync> {
    coll: Collection<T>,
}

impl<T: Send + Sync> MongoRecords<T> {
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            coll: get_collection(db, collection),
        }
    }
}

#[async_trait]
impl<T> RecordStore<T> for MongoRecords<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static,
{
    async fn list(&self, filter: Option<&FieldFilter>) -> Result<Vec<T>, StoreError> {
        Ok(find_all(&self.coll, FieldFilter::to_document(filter)).await?)
    }

    async fn insert(&self, record: &T) -> Result<(), StoreError> {
        self.coll.insert_one(record).await?;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = self.coll.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count == 1)
    }
}
