//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main router configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Downstream endpoint URLs
    pub endpoints: EndpointsConfig,

    /// Outbound HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Event routing settings
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RouterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.endpoints.validate()?;
        self.http.validate(&self.environment)?;
        self.routing.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (record dispatches instead of sending them)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Downstream endpoint URLs
///
/// Query parameters are appended to these at routing time, so they should
/// not carry a query string of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Generic CIH integration endpoint
    pub cih_integration_url: String,

    /// CIH endpoint receiving referrals
    pub cih_referral_url: String,

    /// Consumer patient lookup by id
    pub consumer_patient_url: String,

    /// Consumer patient lookup by signed CANS document
    pub consumer_patient_cans_url: String,

    /// Consumer patient contact information lookup
    pub consumer_contact_info_url: String,

    /// Configuration service value lookup
    pub configuration_value_url: String,

    /// Configuration service organization genealogy lookup
    pub configuration_organization_url: String,
}

impl EndpointsConfig {
    /// Every configured endpoint, paired with its config key
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("cih_integration_url", self.cih_integration_url.as_str()),
            ("cih_referral_url", self.cih_referral_url.as_str()),
            ("consumer_patient_url", self.consumer_patient_url.as_str()),
            (
                "consumer_patient_cans_url",
                self.consumer_patient_cans_url.as_str(),
            ),
            (
                "consumer_contact_info_url",
                self.consumer_contact_info_url.as_str(),
            ),
            ("configuration_value_url", self.configuration_value_url.as_str()),
            (
                "configuration_organization_url",
                self.configuration_organization_url.as_str(),
            ),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        for (key, value) in self.entries() {
            if value.is_empty() {
                return Err(format!("endpoints.{key} cannot be empty"));
            }
            let url = Url::parse(value)
                .map_err(|e| format!("endpoints.{key} is not a valid URL '{value}': {e}"))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(format!(
                    "endpoints.{key} must start with http:// or https://"
                ));
            }
            if url.query().is_some() {
                return Err(format!("endpoints.{key} must not contain a query string"));
            }
        }
        Ok(())
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "http.retry.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "http.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Outbound HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes patient data to
    /// man-in-the-middle attacks. It is rejected in production environments.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Bearer token sent on every outbound call (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl HttpConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.timeout_seconds == 0 {
            return Err("http.timeout_seconds must be > 0".to_string());
        }

        if self
            .auth_token
            .as_ref()
            .map(|t| t.expose_secret().is_empty())
            .unwrap_or(false)
        {
            return Err("http.auth_token cannot be empty when set".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true', or use 'environment = \"development\"' for local testing."
                    .to_string(),
            );
        }

        self.retry.validate()?;
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            tls_verify: true,
            auth_token: None,
            retry: RetryConfig::default(),
        }
    }
}

/// Event routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Maximum number of events routed concurrently by the CLI
    #[serde(default = "default_max_concurrent_events")]
    pub max_concurrent_events: usize,
}

impl RoutingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_events == 0 || self.max_concurrent_events > 256 {
            return Err(format!(
                "routing.max_concurrent_events must be between 1 and 256, got {}",
                self.max_concurrent_events
            ));
        }
        Ok(())
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_events: default_max_concurrent_events(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_concurrent_events() -> usize {
    8
}

fn default_local_path() -> String {
    "/var/log/patient-router".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn endpoints() -> EndpointsConfig {
        EndpointsConfig {
            cih_integration_url: "http://cih.local/integration".to_string(),
            cih_referral_url: "http://cih.local/referral".to_string(),
            consumer_patient_url: "http://consumer.local/patient".to_string(),
            consumer_patient_cans_url: "http://consumer.local/patient/cans".to_string(),
            consumer_contact_info_url: "http://consumer.local/patient/contact".to_string(),
            configuration_value_url: "http://config.local/value".to_string(),
            configuration_organization_url: "http://config.local/organization".to_string(),
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoints_validation() {
        let mut config = endpoints();
        assert!(config.validate().is_ok());

        config.cih_referral_url = String::new();
        assert!(config
            .validate()
            .unwrap_err()
            .contains("endpoints.cih_referral_url"));

        config.cih_referral_url = "ftp://cih.local/referral".to_string();
        assert!(config.validate().is_err());

        config.cih_referral_url = "http://cih.local/referral?x=1".to_string();
        assert!(config.validate().unwrap_err().contains("query string"));

        config.cih_referral_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_tls_verification_in_production() {
        let mut config = HttpConfig::default();
        assert!(config.validate(&Environment::Production).is_ok());

        config.tls_verify = false;
        assert!(config.validate(&Environment::Development).is_ok());
        let err = config.validate(&Environment::Production).unwrap_err();
        assert!(err.contains("cannot be disabled in production"));
    }

    #[test]
    fn test_http_empty_token_rejected() {
        let config = HttpConfig {
            auth_token: Some(secret_string(String::new())),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_retry_validation() {
        let mut retry = RetryConfig::default();
        assert!(retry.validate().is_ok());

        retry.max_retries = 0;
        assert!(retry.validate().is_err());

        retry.max_retries = 3;
        retry.backoff_multiplier = 0.5;
        assert!(retry.validate().is_err());
    }

    #[test]
    fn test_routing_validation() {
        let mut routing = RoutingConfig::default();
        assert!(routing.validate().is_ok());

        routing.max_concurrent_events = 0;
        assert!(routing.validate().is_err());
    }

    #[test]
    fn test_logging_validation() {
        let mut logging = LoggingConfig::default();
        assert!(logging.validate().is_ok());

        logging.local_rotation = "weekly".to_string();
        assert!(logging.validate().is_err());
    }

    #[test]
    fn test_full_config_validation() {
        let config = RouterConfig {
            application: ApplicationConfig::default(),
            environment: Environment::Production,
            endpoints: endpoints(),
            http: HttpConfig::default(),
            routing: RoutingConfig::default(),
            logging: LoggingConfig::default(),
        };
        assert!(config.validate().is_ok());
    }
}
