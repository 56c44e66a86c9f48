//! Access/refresh token minting and verification.
//!
//! Refresh verification is pure: signature and expiry only, no database
//! lookup and no deny-list. A refresh token stays valid until it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{Constants, TokenSecrets};
use crate::error::TokenError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    fn expiring_in(user_id: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        }
    }
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Mints and checks tokens with two distinct secrets.
pub struct TokenAuthority {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl TokenAuthority {
    pub fn new(secrets: &TokenSecrets) -> Self {
        // Expired means expired: no clock tolerance on `exp`.
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            access: KeyPair::from_secret(secrets.access()),
            refresh: KeyPair::from_secret(secrets.refresh()),
            validation,
        }
    }

    pub fn create_access_token(&self, user_id: &str) -> Result<String, TokenError> {
        let claims = Claims::expiring_in(
            user_id,
            Duration::minutes(Constants::ACCESS_TOKEN_TTL_MINUTES),
        );
        encode(&Header::default(), &claims, &self.access.encoding).map_err(TokenError::Signing)
    }

    pub fn create_refresh_token(&self, user_id: &str) -> Result<String, TokenError> {
        let claims = Claims::expiring_in(user_id, Duration::days(Constants::REFRESH_TOKEN_TTL_DAYS));
        encode(&Header::default(), &claims, &self.refresh.encoding).map_err(TokenError::Signing)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.access.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.refresh.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    /// Exchanges the raw `refresh_token` cookie value for a new access token.
    ///
    /// An absent or empty cookie is [`TokenError::Missing`] and no signature
    /// check is attempted.
    pub fn refresh(&self, cookie: Option<&str>) -> Result<String, TokenError> {
        let token = cookie
            .filter(|token| !token.is_empty())
            .ok_or(TokenError::Missing)?;
        let claims = self.verify_refresh_token(token)?;
        self.create_access_token(&claims.user_id)
    }
}
