use axum::{
    http::StatusCode,
    response::Response,
};
use chrono::{NaiveDate, NaiveTime};
use futures::TryStreamExt;
use mongodb::{
    bson::{oid::ObjectId, DateTime, Document},
    Collection,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::records::RecordStore;
use crate::utils::{error_response, success_response};

/// Delete a record by hex id: 400 on a malformed id, 404 when nothing matched.
pub async fn delete_by_id<T>(store: &dyn RecordStore<T>, record: &str, id: &str) -> Response
where
    T: Send + Sync + 'static,
{
    let obj_id = match parse_object_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.delete(obj_id).await {
        Ok(true) => success_response(StatusCode::OK, json!({"status": "deleted"})),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => {
            tracing::error!(record, id = %obj_id, error = %e, "delete failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete")
        }
    }
}

/// Parse a hex id from a path segment, answering 400 when it is malformed.
pub fn parse_object_id(id: &str) -> Result<ObjectId, Response> {
    ObjectId::parse_str(id).map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid id"))
}

/// Collect every document matching `filter`.
pub async fn find_all<T>(coll: &Collection<T>, filter: Document) -> mongodb::error::Result<Vec<T>>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    coll.find(filter).await?.try_collect().await
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_day(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Midnight UTC of `day` as a BSON date
pub fn day_to_datetime(day: NaiveDate) -> DateTime {
    DateTime::from_millis(day.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

/// UTC calendar day of a BSON date; `None` outside chrono's range
pub fn datetime_to_day(date: DateTime) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp_millis(date.timestamp_millis()).map(|dt| dt.date_naive())
}

/// Half-open `[first of month, first of next month)` range
pub fn month_range(year: i32, month: u32) -> Option<(DateTime, DateTime)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((day_to_datetime(start), day_to_datetime(end)))
}
