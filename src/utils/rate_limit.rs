use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::time::SystemTime;

use crate::config::Constants;

static OTP_REQUESTS: Lazy<DashMap<String, Vec<SystemTime>>> = Lazy::new(DashMap::new);

/// Check if login code requests for this email exceed the rate limit
pub fn check_otp_rate_limit(email: &str) -> Result<(), String> {
    record_attempt(&OTP_REQUESTS, email, SystemTime::now())
}

fn record_attempt(
    attempts: &DashMap<String, Vec<SystemTime>>,
    key: &str,
    now: SystemTime,
) -> Result<(), String> {
    let mut entry = attempts.entry(key.to_string()).or_default();
    entry.retain(|&t| now.duration_since(t).unwrap_or_default() < Constants::OTP_RATE_LIMIT_WINDOW);

    if entry.len() >= Constants::MAX_OTP_REQUESTS {
        return Err("Too many login code requests. Try again later.".to_string());
    }

    entry.push(now);
    Ok(())
}
