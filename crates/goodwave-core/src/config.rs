use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let base_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(invalid(var, format!("\"{raw}\" is not an http(s) URL")));
        }
        Ok(trimmed.to_string())
    };

    let env = parse_environment(&or_default("GOODWAVE_ENV", "development"))?;

    let api_base_url = base_url("GOODWAVE_API_BASE_URL", "http://127.0.0.1:8000")?;
    let user_id = parse_u64("GOODWAVE_USER_ID", "1")?;

    let page_size = parse_u32("GOODWAVE_PAGE_SIZE", "10")?;
    if page_size == 0 {
        return Err(invalid("GOODWAVE_PAGE_SIZE", "must be at least 1".to_string()));
    }

    let request_timeout_secs = parse_u64("GOODWAVE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("GOODWAVE_USER_AGENT", "goodwave/0.1 (surf-spots)");

    let geocoder_base_url = base_url(
        "GOODWAVE_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    )?;
    let geocode_max_concurrent = parse_usize("GOODWAVE_GEOCODE_MAX_CONCURRENT", "3")?;
    if geocode_max_concurrent == 0 {
        return Err(invalid(
            "GOODWAVE_GEOCODE_MAX_CONCURRENT",
            "must be at least 1".to_string(),
        ));
    }

    let log_level = or_default("GOODWAVE_LOG_LEVEL", "info");

    Ok(AppConfig {
        env,
        api_base_url,
        user_id,
        page_size,
        request_timeout_secs,
        user_agent,
        geocoder_base_url,
        geocode_max_concurrent,
        log_level,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GOODWAVE_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
