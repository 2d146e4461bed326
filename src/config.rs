//! Process configuration read from the environment.

use std::env;

use anyhow::{Result, anyhow};
use chrono_tz::Tz;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://api.appselsyn.com.br/keek/rest/v1/integracao/posicao";
pub const DEFAULT_DISPLAY_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

/// Look up a setting, falling back to its default when one exists.
///
/// # Errors
///
/// Returns an error when `key` is unset (or blank) and has no default.
pub fn get(key: &str) -> Result<String> {
    if let Ok(value) = env::var(key) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            tracing::trace!("{key} loaded from environment");
            return Ok(trimmed.to_string());
        }
    }

    let default = default(key).ok_or_else(|| anyhow!("{key} is not set"))?;
    tracing::trace!("{key} not set, using default: {default}");
    Ok(default)
}

pub fn get_port() -> u16 {
    get("PORT").ok().and_then(|port| port.parse().ok()).unwrap_or_else(|| {
        tracing::warn!("invalid PORT, using default: {DEFAULT_PORT}");
        DEFAULT_PORT
    })
}

pub fn get_display_timezone() -> Tz {
    get("DISPLAY_TIMEZONE").ok().and_then(|zone| zone.parse().ok()).unwrap_or_else(|| {
        tracing::warn!("invalid DISPLAY_TIMEZONE, using default: {DEFAULT_DISPLAY_TIMEZONE}");
        DEFAULT_DISPLAY_TIMEZONE
    })
}

fn default(key: &str) -> Option<String> {
    match key {
        "PORT" => Some(DEFAULT_PORT.to_string()),
        "UPSTREAM_URL" => Some(DEFAULT_UPSTREAM_URL.to_string()),
        "DISPLAY_TIMEZONE" => Some(DEFAULT_DISPLAY_TIMEZONE.name().to_string()),
        _ => None,
    }
}
