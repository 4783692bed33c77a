use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

/// Highest zoom level any supported map provider renders.
const ZOOM_CEILING: u8 = 22;

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
/// The parsing/validation logic is decoupled from the real environment so it
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_zoom = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let zoom = or_default(var, default)
            .parse::<u8>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if zoom > ZOOM_CEILING {
            return Err(invalid(var, format!("zoom must be at most {ZOOM_CEILING}")));
        }
        Ok(zoom)
    };

    let parse_coordinate = |var: &str, raw: &str| -> Result<Coordinate, ConfigError> {
        raw.parse::<Coordinate>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let optional_coordinate = |var: &str| -> Result<Option<Coordinate>, ConfigError> {
        match lookup(var) {
            Ok(raw) if !raw.trim().is_empty() => parse_coordinate(var, &raw).map(Some),
            _ => Ok(None),
        }
    };

    let env = parse_environment(&or_default("PETMAP_ENV", "development"))?;

    let api_base_url = or_default("PETMAP_API_BASE_URL", "http://localhost:5001");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "PETMAP_API_BASE_URL",
            "must start with http:// or https://".to_string(),
        ));
    }

    let log_level = or_default("PETMAP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("PETMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PETMAP_USER_AGENT", "petmap/0.1 (facility-finder)");
    let categories_path = lookup("PETMAP_CATEGORIES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let map_center = parse_coordinate(
        "PETMAP_MAP_CENTER",
        &or_default("PETMAP_MAP_CENTER", "37.5665,126.9780"),
    )?;
    let map_zoom = parse_zoom("PETMAP_MAP_ZOOM", "11")?;
    let map_max_zoom = parse_zoom("PETMAP_MAP_MAX_ZOOM", "16")?;
    if map_zoom > map_max_zoom {
        return Err(ConfigError::Validation(format!(
            "PETMAP_MAP_ZOOM ({map_zoom}) exceeds PETMAP_MAP_MAX_ZOOM ({map_max_zoom})"
        )));
    }

    let search_origin = optional_coordinate("PETMAP_SEARCH_ORIGIN")?;
    let device_location = optional_coordinate("PETMAP_DEVICE_LOCATION")?;
    let api_token = lookup("PETMAP_TOKEN").ok().filter(|t| !t.trim().is_empty());

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        categories_path,
        map_center,
        map_zoom,
        map_max_zoom,
        search_origin,
        device_location,
        api_token,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PETMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
