//! Archive sweep run in front of the assigned-items listing.
//!
//! Every request to the gated route first archives all active items dated in
//! a month before the current one. Updates are independent: a failure midway
//! leaves the items already archived as they are.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::{Datelike, NaiveDate, Utc};
use futures::future::try_join_all;

use crate::db::assigned_items::{AssignedItemStore, SharedAssignedItems};
use crate::error::StoreError;
use crate::utils::error_response;

/// An item is past due when it went out in an earlier month than `today`.
/// The day of the month is ignored.
pub fn is_past_due(out_day: NaiveDate, today: NaiveDate) -> bool {
    out_day.year() < today.year()
        || (out_day.year() == today.year() && out_day.month() < today.month())
}

/// Archives every active past-due item and returns how many were archived.
pub async fn sweep(store: &dyn AssignedItemStore, today: NaiveDate) -> Result<usize, StoreError> {
    let active = store.find_unarchived().await?;

    let due: Vec<_> = active
        .iter()
        .filter(|item| item.out_day().is_some_and(|day| is_past_due(day, today)))
        .map(|item| item.id)
        .collect();

    try_join_all(due.iter().map(|id| store.mark_archived(*id))).await?;
    Ok(due.len())
}

pub async fn archive_sweep(
    State(store): State<SharedAssignedItems>,
    request: Request,
    next: Next,
) -> Response {
    let today = Utc::now().date_naive();

    match sweep(store.as_ref(), today).await {
        Ok(0) => {}
        Ok(archived) => tracing::info!(archived, %today, "archived past-due assigned items"),
        Err(e) => {
            tracing::error!(error = %e, "archive sweep failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update archived items.",
            );
        }
    }

    next.run(request).await
}
