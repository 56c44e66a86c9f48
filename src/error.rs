//! Error types shared across the server.

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

/// Fatal configuration problems, raised once at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set in environment variables")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Failures from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("assigned item {0} not found")]
    NotFound(ObjectId),
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token missing")]
    Missing,

    #[error("token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("mail task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Everything that can stop the server before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to MongoDB: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("failed to set up mail transport: {0}")]
    Mail(#[from] MailError),

    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_variable() {
        let err = ConfigError::Missing("ACCESS_SECRET");
        assert_eq!(err.to_string(), "ACCESS_SECRET not set in environment variables");
    }

    #[test]
    fn store_not_found_carries_id() {
        let id = ObjectId::new();
        let err = StoreError::NotFound(id);
        assert!(err.to_string().contains(&id.to_hex()));
    }

    #[test]
    fn startup_error_wraps_config_transparently() {
        let err: StartupError = ConfigError::Missing("REFRESH_SECRET").into();
        assert_eq!(err.to_string(), "REFRESH_SECRET not set in environment variables");
    }
}
