use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://fencingtracker.com";
pub const DEFAULT_USER_AGENT: &str = "fencer-strength/0.1 (fencer-lookup)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; this is the parsing/validation core, decoupled
/// from the process environment so it can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let env = parse_environment(&or_default("FENCER_ENV", "development"));
    let base_url = parse_base_url(&or_default("FENCER_BASE_URL", DEFAULT_BASE_URL))?;
    let log_level = or_default("FENCER_LOG_LEVEL", "info");
    let cache_path = PathBuf::from(or_default("FENCER_CACHE_PATH", "./fencer-cache.db"));
    let cache_ttl_secs = parse_u64("FENCER_CACHE_TTL_SECS", "86400")?;
    let request_timeout_secs = parse_u64("FENCER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FENCER_USER_AGENT", DEFAULT_USER_AGENT);

    let max_attempts = parse_u32("FENCER_MAX_ATTEMPTS", "2")?;
    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FENCER_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let retry_backoff_ms = parse_u64("FENCER_RETRY_BACKOFF_MS", "2000")?;
    let search_limit = parse_u32("FENCER_SEARCH_LIMIT", "10")?;

    Ok(AppConfig {
        env,
        base_url,
        log_level,
        cache_path,
        cache_ttl_secs,
        request_timeout_secs,
        user_agent,
        max_attempts,
        retry_backoff_ms,
        search_limit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Require an absolute `http`/`https` origin and strip any trailing slash.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("https://") || trimmed.starts_with("http://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());
    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidEnvVar {
            var: "FENCER_BASE_URL".to_string(),
            reason: format!("expected an http(s) origin, got \"{raw}\""),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
