use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    db::{
        operations::delete_by_id,
        records::{FieldFilter, SharedRecords},
    },
    middleware::auth::AuthUser,
    structure::inventory::{InventoryItem, InventoryItemResponse, NewInventoryItem},
    utils::{error_response, success_response},
};

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub product_id: Option<String>,
}

pub async fn list_inventory(
    _user: AuthUser,
    State(store): State<SharedRecords<InventoryItem>>,
    Query(params): Query<InventoryQuery>,
) -> Response {
    let filter = params.product_id.map(|value| FieldFilter {
        field: "product_id",
        value,
    });

    match store.list(filter.as_ref()).await {
        Ok(items) => success_response(
            StatusCode::OK,
            items
                .into_iter()
                .map(InventoryItemResponse::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list inventory");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch inventory.")
        }
    }
}

pub async fn add_inventory_item(
    _user: AuthUser,
    State(store): State<SharedRecords<InventoryItem>>,
    Json(payload): Json<NewInventoryItem>,
) -> Response {
    let item = match payload.into_item() {
        Ok(item) => item,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };

    match store.insert(&item).await {
        Ok(()) => success_response(StatusCode::CREATED, InventoryItemResponse::from(item)),
        Err(e) => {
            tracing::error!(error = %e, "failed to insert inventory item");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create inventory item.")
        }
    }
}

pub async fn delete_inventory_item(
    _user: AuthUser,
    State(store): State<SharedRecords<InventoryItem>>,
    Path(id): Path<String>,
) -> Response {
    delete_by_id(store.as_ref(), "inventory item", &id).await
}
