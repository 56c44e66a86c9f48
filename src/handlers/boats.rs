use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    db::{operations::delete_by_id, records::SharedRecords},
    middleware::auth::AuthUser,
    structure::boats::{Boat, BoatResponse, NewBoat},
    utils::{error_response, success_response},
};

pub async fn list_boats(_user: AuthUser, State(store): State<SharedRecords<Boat>>) -> Response {
    match store.list(None).await {
        Ok(docs) => success_response(
            StatusCode::OK,
            docs.into_iter()
                .map(BoatResponse::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list boats");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch boats.")
        }
    }
}

pub async fn add_boat(
    _user: AuthUser,
    State(store): State<SharedRecords<Boat>>,
    Json(payload): Json<NewBoat>,
) -> Response {
    let new_doc = match payload.into_boat() {
        Ok(doc) => doc,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };

    match store.insert(&new_doc).await {
        Ok(()) => success_response(StatusCode::CREATED, BoatResponse::from(new_doc)),
        Err(e) => {
            tracing::error!(error = %e, "failed to insert boat");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create boat.")
        }
    }
}

pub async fn delete_boat(
    _user: AuthUser,
    State(store): State<SharedRecords<Boat>>,
    Path(id): Path<String>,
) -> Response {
    delete_by_id(store.as_ref(), "boat", &id).await
}
