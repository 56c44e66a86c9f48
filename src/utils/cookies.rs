use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use crate::config::Constants;

/// Cookie flags that depend on the deployment mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSettings {
    /// Adds `Secure` to the refresh cookie, and `HttpOnly; Secure;
    /// SameSite=Strict` to the cleared one.
    pub production: bool,
}

impl CookieSettings {
    fn harden_in_production(self, mut cookie: Cookie<'static>) -> Cookie<'static> {
        if self.production {
            cookie.set_http_only(true);
            cookie.set_secure(true);
            cookie.set_same_site(SameSite::Strict);
        }
        cookie
    }

    /// Cookie carrying a freshly minted refresh token. Never readable from
    /// scripts; `Secure` only in production.
    pub fn refresh_cookie(self, token: String) -> Cookie<'static> {
        Cookie::build((Constants::REFRESH_COOKIE, token))
            .path("/")
            .max_age(Duration::days(Constants::REFRESH_TOKEN_TTL_DAYS))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.production)
            .build()
    }

    /// Empty refresh cookie that expired at the epoch.
    pub fn cleared_refresh_cookie(self) -> Cookie<'static> {
        let cookie = Cookie::build((Constants::REFRESH_COOKIE, ""))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build();
        self.harden_in_production(cookie)
    }
}
