use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    db::{operations::delete_by_id, records::SharedRecords},
    middleware::auth::AuthUser,
    structure::products::{NewProduct, Product, ProductResponse},
    utils::{error_response, success_response},
};

pub async fn list_products(
    _user: AuthUser,
    State(store): State<SharedRecords<Product>>,
) -> Response {
    match store.list(None).await {
        Ok(docs) => success_response(
            StatusCode::OK,
            docs.into_iter()
                .map(ProductResponse::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list products");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch products.")
        }
    }
}

pub async fn add_product(
    _user: AuthUser,
    State(store): State<SharedRecords<Product>>,
    Json(payload): Json<NewProduct>,
) -> Response {
    let new_doc = match payload.into_product() {
        Ok(doc) => doc,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };

    match store.insert(&new_doc).await {
        Ok(()) => success_response(StatusCode::CREATED, ProductResponse::from(new_doc)),
        Err(e) => {
            tracing::error!(error = %e, "failed to insert product");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create product.")
        }
    }
}

pub async fn delete_product(
    _user: AuthUser,
    State(store): State<SharedRecords<Product>>,
    Path(id): Path<String>,
) -> Response {
    delete_by_id(store.as_ref(), "product", &id).await
}
