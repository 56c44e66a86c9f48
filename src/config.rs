use std::fmt;
use std::time::Duration as StdDuration;

use crate::error::ConfigError;

/// Signing secrets for access and refresh tokens.
///
/// Both must be present and non-empty; a `TokenSecrets` value is proof of that.
#[derive(Clone)]
pub struct TokenSecrets {
    access: String,
    refresh: String,
}

impl TokenSecrets {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Result<Self, ConfigError> {
        let access = access.into();
        let refresh = refresh.into();
        if access.is_empty() {
            return Err(ConfigError::Missing("ACCESS_SECRET"));
        }
        if refresh.is_empty() {
            return Err(ConfigError::Missing("REFRESH_SECRET"));
        }
        Ok(Self { access, refresh })
    }

    pub fn access(&self) -> &[u8] {
        self.access.as_bytes()
    }

    pub fn refresh(&self) -> &[u8] {
        self.refresh.as_bytes()
    }
}

impl fmt::Debug for TokenSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSecrets")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct MailSettings {
    pub host: String,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongo_db_url: String,
    /// `NODE_ENV=production`; turns on the secure cookie flags.
    pub production: bool,
    pub secrets: TokenSecrets,
    /// `None` when any of the SMTP variables is missing.
    pub mail: Option<MailSettings>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let secrets = TokenSecrets::new(required("ACCESS_SECRET")?, required("REFRESH_SECRET")?)?;
        let mongo_db_url = required("MONGO_DB_URL")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => Constants::DEFAULT_PORT,
        };

        let production = lookup("NODE_ENV").as_deref() == Some("production");

        let mail = match (
            lookup("SMTP_HOST"),
            lookup("SMTP_USER"),
            lookup("SMTP_PASS"),
            lookup("SMTP_FROM"),
        ) {
            (Some(host), Some(user), Some(pass), Some(from)) => Some(MailSettings {
                host,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Self {
            port,
            mongo_db_url,
            production,
            secrets,
            mail,
        })
    }
}

pub struct Constants;

impl Constants {
    pub const DEFAULT_PORT: u16 = 3000;

    pub const DB_NAME: &'static str = "fleet-inventory";

    pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

    pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

    pub const REFRESH_COOKIE: &'static str = "refresh_token";

    pub const OTP_TTL_MINUTES: i64 = 10;

    pub const MAX_OTP_REQUESTS: usize = 5;

    pub const OTP_RATE_LIMIT_WINDOW: StdDuration = StdDuration::from_secs(15 * 60);

    pub const EMAIL_SENDER_NAME: &'static str = "Fleet Inventory";
}
