//! One-time login codes.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use mongodb::bson::DateTime;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpRejection {
    #[error("no login code pending")]
    NotRequested,

    #[error("login code expired")]
    Expired,

    #[error("login code does not match")]
    Mismatch,
}

/// Generate a 6-digit login code
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000))
}

pub fn hash_code(code: &str) -> Result<String, bcrypt::BcryptError> {
    hash(code, DEFAULT_COST)
}

/// Checks a submitted code against the pending hash and its expiry.
pub fn check_code(
    pending_hash: Option<&str>,
    expires_at: Option<DateTime>,
    submitted: &str,
    now: chrono::DateTime<Utc>,
) -> Result<(), OtpRejection> {
    let (pending_hash, expires_at) = match (pending_hash, expires_at) {
        (Some(hash), Some(expires_at)) => (hash, expires_at),
        _ => return Err(OtpRejection::NotRequested),
    };

    if expires_at.timestamp_millis() <= now.timestamp_millis() {
        return Err(OtpRejection::Expired);
    }

    match verify(submitted.trim(), pending_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(OtpRejection::Mismatch),
        Err(err) => {
            tracing::warn!(error = %err, "stored login code hash is unreadable");
            Err(OtpRejection::Mismatch)
        }
    }
}
