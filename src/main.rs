use std::net::SocketAddr;

use axum::{
    handler::Handler,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod state;
mod structure;
#[cfg(test)]
mod testing;
mod utils;

use crate::{
    config::Config,
    error::StartupError,
    handlers::{
        assigned_items::{
            create_assigned_item, list_assigned_items, monthly_summary, unarchive_assigned_item,
        },
        boats::{add_boat, delete_boat, list_boats},
        inventory::{add_inventory_item, delete_inventory_item, list_inventory},
        products::{add_product, delete_product, list_products},
        token::refresh_token_handler,
        user::{
            logout_handler, me_handler, register_handler, request_otp_handler, verify_otp_handler,
        },
    },
    middleware::archive::archive_sweep,
    state::AppState,
    utils::{cookies::CookieSettings, email::Mailer, jwt::TokenAuthority},
};

fn router(state: AppState) -> Router {
    let sweep = from_fn_with_state(state.assigned_items.clone(), archive_sweep);

    Router::new()
        .route("/refresh-token", post(refresh_token_handler))
        .route("/api/user/register", post(register_handler))
        .route("/api/user/otp", post(request_otp_handler))
        .route("/api/user/otp/verify", post(verify_otp_handler))
        .route("/api/user/logout", post(logout_handler))
        .route("/api/user/me", get(me_handler))
        .route("/api/products", get(list_products).post(add_product))
        .route("/api/products/{id}", delete(delete_product))
        .route("/api/inventory", get(list_inventory).post(add_inventory_item))
        .route("/api/inventory/{id}", delete(delete_inventory_item))
        .route("/api/boats", get(list_boats).post(add_boat))
        .route("/api/boats/{id}", delete(delete_boat))
        .route(
            "/api/assigned-items",
            get(list_assigned_items.layer(sweep)).post(create_assigned_item),
        )
        .route("/api/assigned-items/summary", get(monthly_summary))
        .route(
            "/api/assigned-items/{id}/unarchive",
            post(unarchive_assigned_item),
        )
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let tokens = TokenAuthority::new(&config.secrets);
    let mailer = match &config.mail {
        Some(settings) => Some(Mailer::new(settings)?),
        None => {
            tracing::warn!("SMTP settings incomplete; login codes cannot be sent");
            None
        }
    };
    let db = db::connect(&config.mongo_db_url).await?;

    let cookies = CookieSettings {
        production: config.production,
    };
    let app = router(AppState::new(db, tokens, cookies, mailer));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, production = config.production, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
