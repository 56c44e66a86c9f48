use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::{Datelike, Utc};

use crate::{
    db::{
        assigned_items::{AssignedItemFilter, SharedAssignedItems},
        operations::{month_range, parse_object_id},
    },
    middleware::auth::AuthUser,
    structure::assigned_items::{
        AssignedItemQuery, AssignedItemResponse, MonthlySummary, NewAssignedItem, SummaryQuery,
    },
    utils::{error_response, success_response},
};

/// `GET /api/assigned-items`. Runs behind the archive sweep, so the default
/// (active) listing only holds items from the current month onwards.
pub async fn list_assigned_items(
    _user: AuthUser,
    State(store): State<SharedAssignedItems>,
    Query(params): Query<AssignedItemQuery>,
) -> Response {
    let filter = AssignedItemFilter {
        archived: Some(params.archived.unwrap_or(false)),
        boat_id: params.boat_id,
        out_between: None,
    };

    match store.list(&filter).await {
        Ok(items) => success_response(
            StatusCode::OK,
            items
                .into_iter()
                .map(AssignedItemResponse::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list assigned items");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch assigned items.")
        }
    }
}

pub async fn create_assigned_item(
    _user: AuthUser,
    State(store): State<SharedAssignedItems>,
    Json(payload): Json<NewAssignedItem>,
) -> Response {
    let item = match payload.into_item() {
        Ok(item) => item,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };

    match store.insert(&item).await {
        Ok(()) => success_response(StatusCode::CREATED, AssignedItemResponse::from(item)),
        Err(e) => {
            tracing::error!(error = %e, "failed to insert assigned item");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create assigned item.")
        }
    }
}

pub async fn unarchive_assigned_item(
    _user: AuthUser,
    State(store): State<SharedAssignedItems>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_object_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.unarchive(id).await {
        Ok(true) => success_response(StatusCode::OK, serde_json::json!({"status": "unarchived"})),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => {
            tracing::error!(error = %e, %id, "failed to unarchive assigned item");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to unarchive item.")
        }
    }
}

/// `GET /api/assigned-items/summary?year=&month=`, month 1-12, defaulting to
/// the current month. Archived items are included.
pub async fn monthly_summary(
    _user: AuthUser,
    State(store): State<SharedAssignedItems>,
    Query(params): Query<SummaryQuery>,
) -> Response {
    let today = Utc::now().date_naive();
    let year = params.year.unwrap_or(today.year());
    let month = params.month.unwrap_or(today.month());

    let Some(range) = month_range(year, month) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid year or month");
    };

    let filter = AssignedItemFilter {
        out_between: Some(range),
        ..AssignedItemFilter::default()
    };

    match store.list(&filter).await {
        Ok(items) => success_response(
            StatusCode::OK,
            MonthlySummary::from_items(year, month, &items),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to summarise assigned items");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to build summary.")
        }
    }
}
