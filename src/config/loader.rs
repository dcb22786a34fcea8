//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RouterConfig;
use super::secret_string;
use crate::domain::context::ResultExt;
use crate::domain::errors::RouterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "PATIENT_ROUTER";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RouterConfig
/// 4. Applies environment variable overrides (PATIENT_ROUTER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use patient_router::config::loader::load_config;
///
/// let config = load_config("patient-router.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RouterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RouterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Performs the same substitution, override and validation steps as
/// [`load_config`].
pub fn parse_config(contents: &str) -> Result<RouterConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RouterConfig = toml::from_str(&contents)
        .map_err(|e| RouterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        RouterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RouterError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Placeholders in comments are left alone
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RouterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

/// Applies environment variable overrides using the PATIENT_ROUTER_* prefix
///
/// Environment variables follow the pattern: PATIENT_ROUTER_<SECTION>_<KEY>
/// For example: PATIENT_ROUTER_HTTP_TIMEOUT_SECONDS
fn apply_env_overrides(config: &mut RouterConfig) {
    // Application overrides
    if let Some(val) = env("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env("APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Endpoint overrides
    let endpoints = &mut config.endpoints;
    for (key, slot) in [
        ("CIH_INTEGRATION_URL", &mut endpoints.cih_integration_url),
        ("CIH_REFERRAL_URL", &mut endpoints.cih_referral_url),
        ("CONSUMER_PATIENT_URL", &mut endpoints.consumer_patient_url),
        (
            "CONSUMER_PATIENT_CANS_URL",
            &mut endpoints.consumer_patient_cans_url,
        ),
        (
            "CONSUMER_CONTACT_INFO_URL",
            &mut endpoints.consumer_contact_info_url,
        ),
        (
            "CONFIGURATION_VALUE_URL",
            &mut endpoints.configuration_value_url,
        ),
        (
            "CONFIGURATION_ORGANIZATION_URL",
            &mut endpoints.configuration_organization_url,
        ),
    ] {
        if let Some(val) = env(&format!("ENDPOINTS_{key}")) {
            *slot = val;
        }
    }

    // HTTP overrides
    if let Some(val) = env("HTTP_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.http.timeout_seconds = timeout;
        }
    }
    if let Some(val) = env("HTTP_TLS_VERIFY") {
        config.http.tls_verify = val.parse().unwrap_or(true);
    }
    if let Some(val) = env("HTTP_AUTH_TOKEN") {
        config.http.auth_token = Some(secret_string(val));
    }
    if let Some(val) = env("HTTP_RETRY_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.http.retry.max_retries = retries;
        }
    }

    // Routing overrides
    if let Some(val) = env("ROUTING_MAX_CONCURRENT_EVENTS") {
        if let Ok(concurrency) = val.parse() {
            config.routing.max_concurrent_events = concurrency;
        }
    }

    // Logging overrides
    if let Some(val) = env("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
