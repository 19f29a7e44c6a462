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
/// Every variable is optional; the lookup is injected so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("UNIBENCH_ENV", "development"))?;

    let dataset_path = PathBuf::from(or_default(
        "UNIBENCH_DATASET_PATH",
        "./config/dataset.yaml",
    ));
    let log_level = or_default("UNIBENCH_LOG_LEVEL", "info");

    let bind_addr = or_default("UNIBENCH_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("UNIBENCH_BIND_ADDR", e.to_string()))?;

    let compare_capacity = or_default("UNIBENCH_COMPARE_CAPACITY", "4")
        .parse::<usize>()
        .map_err(|e| invalid("UNIBENCH_COMPARE_CAPACITY", e.to_string()))?;
    if compare_capacity == 0 {
        return Err(invalid(
            "UNIBENCH_COMPARE_CAPACITY",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        dataset_path,
        log_level,
        bind_addr,
        compare_capacity,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "UNIBENCH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
