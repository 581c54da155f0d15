use thiserror::Error;

use crate::app_config::{AppConfig, ProxyConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u16 = |var: &str| -> Result<Option<u16>, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .parse::<u16>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(None),
        }
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;

    let search_term = or_default("STORESCOUT_SEARCH_TERM", "kit bolsa maternidade");
    let category_label = or_default("STORESCOUT_CATEGORY", "geral");
    let target_stores = parse_usize("STORESCOUT_TARGET_STORES", "500")?;
    let min_sales = parse_u64("STORESCOUT_MIN_SALES", "500")?;
    // Anything but an explicit "false" keeps the green-reputation requirement on.
    let require_green_reputation = or_default("STORESCOUT_REQUIRE_GREEN", "true") != "false";
    let empty_page_threshold = parse_u32("STORESCOUT_STALL_PAGES", "8")?;
    let max_concurrency = parse_usize("STORESCOUT_MAX_CONCURRENCY", "2")?;
    let request_timeout_secs = parse_u64("STORESCOUT_REQUEST_TIMEOUT_SECS", "90")?;
    let delay_min_ms = parse_u64("STORESCOUT_DELAY_MIN_MS", "5000")?;
    let delay_max_ms = parse_u64("STORESCOUT_DELAY_MAX_MS", "30000")?;

    if max_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STORESCOUT_MAX_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if delay_min_ms > delay_max_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "STORESCOUT_DELAY_MIN_MS".to_string(),
            reason: format!("must not exceed STORESCOUT_DELAY_MAX_MS ({delay_max_ms})"),
        });
    }

    let proxy = match (lookup("STORESCOUT_PROXY_HOST").ok(), parse_u16("STORESCOUT_PROXY_PORT")?) {
        (Some(host), Some(port)) if !host.is_empty() => Some(ProxyConfig {
            host,
            port,
            user: lookup("STORESCOUT_PROXY_USER").ok().filter(|u| !u.is_empty()),
            pass: lookup("STORESCOUT_PROXY_PASS").ok().filter(|p| !p.is_empty()),
        }),
        _ => None,
    };

    Ok(AppConfig {
        database_url,
        search_term,
        category_label,
        target_stores,
        min_sales,
        require_green_reputation,
        empty_page_threshold,
        max_concurrency,
        request_timeout_secs,
        delay_min_ms,
        delay_max_ms,
        proxy,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
