use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use axum_extra::extract::CookieJar;

use crate::{
    config::Constants,
    error::TokenError,
    structure::users::RefreshTokenResponse,
    utils::{error_response, jwt::TokenAuthority, success_response},
};

/// `POST /refresh-token`: trade the refresh cookie for a new access token.
///
/// 401 without a cookie, 403 when it fails verification. The refresh token
/// itself is left untouched.
pub async fn refresh_token_handler(
    State(tokens): State<Arc<TokenAuthority>>,
    jar: CookieJar,
) -> Response {
    let cookie = jar
        .get(Constants::REFRESH_COOKIE)
        .map(|cookie| cookie.value());

    match tokens.refresh(cookie) {
        Ok(access_token) => success_response(StatusCode::OK, RefreshTokenResponse { access_token }),
        Err(TokenError::Missing) => error_response(StatusCode::UNAUTHORIZED, "Refresh token missing"),
        Err(TokenError::Invalid(e)) => {
            tracing::debug!(error = %e, "refresh token rejected");
            error_response(StatusCode::FORBIDDEN, "Invalid refresh token")
        }
        Err(e @ TokenError::Signing(_)) => {
            tracing::error!(error = %e, "failed to mint access token");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to refresh token")
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::header::COOKIE,
        routing::post,
        Router,
    };
    use chrono::Utc;
    use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
    use tower::ServiceExt;

    use super::*;
    use crate::testing::{authority, body_json, request, ACCESS_SECRET, REFRESH_SECRET};
    use crate::utils::jwt::Claims;

    fn app() -> Router {
        Router::new()
            .route("/refresh-token", post(refresh_token_handler))
            .with_state(authority())
    }

    async fn refresh_with(cookie: Option<String>) -> Response {
        let mut builder = request("POST", "/refresh-token");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    fn signed(user_id: &str, exp_offset_secs: i64, secret: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now as usize,
            exp: (now + exp_offset_secs) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn missing_cookie_is_unauthorized() {
        let response = refresh_with(None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert!(body.get("accessToken").is_none());
    }

    #[tokio::test]
    async fn empty_cookie_is_unauthorized() {
        let response = refresh_with(Some("refresh_token=".into())).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_cookie_mints_fifteen_minute_access_token() {
        let refresh = signed("42", 7 * 24 * 3600, REFRESH_SECRET);

        let response = refresh_with(Some(format!("refresh_token={refresh}"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("set-cookie").is_none());
        let body = body_json(response).await;
        let access = body["accessToken"].as_str().unwrap();

        let claims = decode::<Claims>(
            access,
            &DecodingKey::from_secret(ACCESS_SECRET.as_bytes()),
            &Validation::default(),
        )
        .unwrap()
        .claims;
        assert_eq!(claims.user_id, "42");
        let ttl = claims.exp as i64 - Utc::now().timestamp();
        assert!((14 * 60..=15 * 60).contains(&ttl), "ttl was {ttl}");
    }

    #[tokio::test]
    async fn wrong_secret_is_forbidden() {
        let forged = signed("42", 3600, "some-other-secret");
        let response = refresh_with(Some(format!("refresh_token={forged}"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn access_secret_does_not_sign_refresh_tokens() {
        let token = signed("42", 3600, ACCESS_SECRET);
        let response = refresh_with(Some(format!("refresh_token={token}"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn expired_cookie_is_forbidden() {
        let expired = signed("42", -3600, REFRESH_SECRET);
        let response = refresh_with(Some(format!("refresh_token={expired}"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn cookie_expired_seconds_ago_is_forbidden() {
        let expired = signed("42", -5, REFRESH_SECRET);
        let response = refresh_with(Some(format!("refresh_token={expired}"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_json(response).await.get("accessToken").is_none());
    }

    #[tokio::test]
    async fn other_cookies_are_ignored() {
        let refresh = signed("42", 3600, REFRESH_SECRET);
        let response = refresh_with(Some(format!("session=abc; refresh_token={refresh}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
