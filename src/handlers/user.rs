use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};

use crate::{
    config::Constants,
    db::users::SharedUsers,
    middleware::auth::AuthUser,
    structure::users::{
        normalize_email, LoginResponse, OtpRequest, RegisterRequest, User, UserResponse,
        VerifyOtpRequest,
    },
    utils::{
        cookies::CookieSettings, email::Mailer, error_response, jwt::TokenAuthority, otp,
        rate_limit, success_response,
    },
};

pub async fn register_handler(
    State(users): State<SharedUsers>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    let Some(email) = normalize_email(&payload.email) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid email");
    };
    let name = payload.name.trim();
    if name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Name is required");
    }

    match users.find_by_email(&email).await {
        Ok(Some(_)) => return error_response(StatusCode::CONFLICT, "User already exists"),
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to register user");
        }
    }

    let new_user = User {
        id: ObjectId::new(),
        email,
        name: name.to_string(),
        otp_hash: None,
        otp_expires_at: None,
    };

    if let Err(e) = users.insert(&new_user).await {
        tracing::error!(error = %e, "user insert failed");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to register user");
    }

    tracing::info!(user_id = %new_user.id, "user registered");
    success_response(StatusCode::CREATED, UserResponse::from(new_user))
}

/// `POST /api/user/otp`: e-mail a fresh login code.
pub async fn request_otp_handler(
    State(users): State<SharedUsers>,
    State(mailer): State<Option<Mailer>>,
    Json(payload): Json<OtpRequest>,
) -> Response {
    let Some(email) = normalize_email(&payload.email) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid email");
    };

    if let Err(msg) = rate_limit::check_otp_rate_limit(&email) {
        return error_response(StatusCode::TOO_MANY_REQUESTS, &msg);
    }

    let user = match users.find_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send code");
        }
    };

    let Some(mailer) = mailer else {
        tracing::warn!("login code requested but SMTP is not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Email delivery not configured",
        );
    };

    let code = otp::generate_code();
    let otp_hash = match otp::hash_code(&code) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "failed to hash login code");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send code");
        }
    };
    let expires_at = Utc::now() + Duration::minutes(Constants::OTP_TTL_MINUTES);

    if let Err(e) = users
        .set_otp(
            user.id,
            &otp_hash,
            DateTime::from_millis(expires_at.timestamp_millis()),
        )
        .await
    {
        tracing::error!(error = %e, "failed to store login code");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send code");
    }

    if let Err(e) = mailer
        .send(&user.email, "Your login code", format!("Code: {code}"))
        .await
    {
        tracing::error!(error = %e, "failed to send login code");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send code");
    }

    success_response(StatusCode::OK, serde_json::json!({"status": "otp_sent"}))
}

/// `POST /api/user/otp/verify`: log in with a code, setting the refresh cookie.
pub async fn verify_otp_handler(
    State(users): State<SharedUsers>,
    State(tokens): State<Arc<TokenAuthority>>,
    State(cookies): State<CookieSettings>,
    jar: CookieJar,
    Json(payload): Json<VerifyOtpRequest>,
) -> Response {
    let Some(email) = normalize_email(&payload.email) else {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid code");
    };

    let user = match users.find_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return error_response(StatusCode::UNAUTHORIZED, "Invalid code"),
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to verify code");
        }
    };

    if let Err(rejection) = otp::check_code(
        user.otp_hash.as_deref(),
        user.otp_expires_at,
        &payload.code,
        Utc::now(),
    ) {
        tracing::debug!(user_id = %user.id, %rejection, "login code rejected");
        return error_response(StatusCode::UNAUTHORIZED, "Invalid code");
    }

    if let Err(e) = users.clear_otp(user.id).await {
        tracing::error!(error = %e, "failed to clear login code");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to verify code");
    }

    let user_id = user.id.to_hex();
    let (access_token, refresh_token) = match tokens
        .create_access_token(&user_id)
        .and_then(|access| Ok((access, tokens.create_refresh_token(&user_id)?)))
    {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "failed to mint tokens");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to verify code");
        }
    };

    tracing::info!(user_id = %user_id, "user logged in");
    (
        jar.add(cookies.refresh_cookie(refresh_token)),
        success_response(
            StatusCode::OK,
            LoginResponse {
                access_token,
                user_id,
                name: user.name,
            },
        ),
    )
        .into_response()
}

/// `POST /api/user/logout`: always succeeds, whether or not a session exists.
pub async fn logout_handler(State(cookies): State<CookieSettings>, jar: CookieJar) -> Response {
    (
        jar.add(cookies.cleared_refresh_cookie()),
        success_response(
            StatusCode::OK,
            serde_json::json!({"message": "Logged out successfully"}),
        ),
    )
        .into_response()
}

pub async fn me_handler(user: AuthUser, State(users): State<SharedUsers>) -> Response {
    let Ok(id) = ObjectId::parse_str(&user.user_id) else {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid session");
    };

    match users.find_by_id(id).await {
        Ok(Some(user)) => success_response(StatusCode::OK, UserResponse::from(user)),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load user")
        }
    }
}
