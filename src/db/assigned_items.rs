use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    Collection, Database,
};

use super::{get_collection, operations::find_all, Collections};
use crate::error::StoreError;
use crate::structure::assigned_items::AssignedItem;

#[derive(Debug, Clone, Default)]
pub struct AssignedItemFilter {
    pub archived: Option<bool>,
    pub boat_id: Option<String>,
    /// Half-open `[start, end)` range over `out_date`.
    pub out_between: Option<(DateTime, DateTime)>,
}

impl AssignedItemFilter {
    pub fn unarchived() -> Self {
        Self {
            archived: Some(false),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn matches(&self, item: &AssignedItem) -> bool {
        self.archived.is_none_or(|archived| item.archived == archived)
            && self.boat_id.as_ref().is_none_or(|boat| &item.boat_id == boat)
            && self
                .out_between
                .is_none_or(|(start, end)| item.out_date >= start && item.out_date < end)
    }

    fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(archived) = self.archived {
            filter.insert("archived", archived);
        }
        if let Some(boat_id) = &self.boat_id {
            filter.insert("boat_id", boat_id);
        }
        if let Some((start, end)) = self.out_between {
            filter.insert("out_date", doc! { "$gte": start, "$lt": end });
        }
        filter
    }
}

/// Persistence for assigned items.
#[async_trait]
pub trait AssignedItemStore: Send + Sync {
    async fn list(&self, filter: &AssignedItemFilter) -> Result<Vec<AssignedItem>, StoreError>;

    /// Sets `archived = true` on one item. A missing item is an error.
    async fn mark_archived(&self, id: ObjectId) -> Result<(), StoreError>;

    async fn insert(&self, item: &AssignedItem) -> Result<(), StoreError>;

    /// Clears the archived flag; `false` when no such item exists.
    async fn unarchive(&self, id: ObjectId) -> Result<bool, StoreError>;

    async fn find_unarchived(&self) -> Result<Vec<AssignedItem>, StoreError> {
        self.list(&AssignedItemFilter::unarchived()).await
    }
}

pub type SharedAssignedItems = Arc<dyn AssignedItemStore>;

pub struct MongoAssignedItems {
    coll: Collection<AssignedItem>,
}

impl MongoAssignedItems {
    pub fn new(db: &Database) -> Self {
        Self {
            coll: get_collection(db, Collections::ASSIGNED_ITEMS),
        }
    }
}

#[async_trait]
impl AssignedItemStore for MongoAssignedItems {
    async fn list(&self, filter: &AssignedItemFilter) -> Result<Vec<AssignedItem>, StoreError> {
        Ok(find_all(&self.coll, filter.to_document()).await?)
    }

    async fn mark_archived(&self, id: ObjectId) -> Result<(), StoreError> {
        let result = self
            .coll
            .update_one(doc! { "_id": id }, doc! { "$set": { "archived": true } })
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn insert(&self, item: &AssignedItem) -> Result<(), StoreError> {
        self.coll.insert_one(item).await?;
        Ok(())
    }

    async fn unarchive(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = self
            .coll
            .update_one(doc! { "_id": id }, doc! { "$set": { "archived": false } })
            .await?;
        Ok(result.matched_count == 1)
    }
}
