use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use crate::utils::jwt::TokenAuthority;

/// Caller identified by a valid `Authorization: Bearer <access token>`.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenAuthority>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_str()
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let tokens = Arc::<TokenAuthority>::from_ref(state);
        let claims = tokens.verify_access_token(token).map_err(|e| {
            tracing::debug!(error = %e, "access token rejected");
            StatusCode::UNAUTHORIZED
        })?;

        Ok(AuthUser {
            user_id: claims.user_id,
        })
    }
}
