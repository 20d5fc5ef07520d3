use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::AppConfig;

/// Errors raised while building [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed. Every variable is optional; absent ones
/// take the documented default.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("RANKCART_LOG_LEVEL", "info");
    let report_dir = PathBuf::from(or_default("RANKCART_REPORT_DIR", "."));

    let settle_delay_ms = parse_u64("RANKCART_SETTLE_DELAY_MS", "2000")?;
    let scroll_step_px = parse_u64("RANKCART_SCROLL_STEP_PX", "500")?;
    let max_cards_to_scan = parse_u64("RANKCART_MAX_CARDS_TO_SCAN", "500")?;

    let nav_timeout_secs = parse_u64("RANKCART_NAV_TIMEOUT_SECS", "90")?;
    let element_timeout_secs = parse_u64("RANKCART_ELEMENT_TIMEOUT_SECS", "60")?;
    let cart_timeout_secs = parse_u64("RANKCART_CART_TIMEOUT_SECS", "30")?;
    let cart_settle_ms = parse_u64("RANKCART_CART_SETTLE_MS", "5000")?;

    Ok(AppConfig {
        log_level,
        report_dir,
        settle_delay_ms,
        scroll_step_px,
        max_cards_to_scan,
        nav_timeout_secs,
        element_timeout_secs,
        cart_timeout_secs,
        cart_settle_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
