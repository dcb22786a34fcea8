//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use patient_router::config::{load_config, Environment};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENDPOINTS: &str = r#"
[endpoints]
cih_integration_url = "https://cih.example.com/integration"
cih_referral_url = "https://cih.example.com/referral"
consumer_patient_url = "https://consumer.example.com/patient"
consumer_patient_cans_url = "https://consumer.example.com/patient/cans"
consumer_contact_info_url = "https://consumer.example.com/patient/contact"
configuration_value_url = "https://configuration.example.com/value"
configuration_organization_url = "https://configuration.example.com/organization"
"#;

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("PATIENT_ROUTER_APPLICATION_LOG_LEVEL");
    std::env::remove_var("PATIENT_ROUTER_APPLICATION_DRY_RUN");
    std::env::remove_var("PATIENT_ROUTER_ENDPOINTS_CIH_REFERRAL_URL");
    std::env::remove_var("PATIENT_ROUTER_HTTP_TIMEOUT_SECONDS");
    std::env::remove_var("PATIENT_ROUTER_HTTP_AUTH_TOKEN");
    std::env::remove_var("PATIENT_ROUTER_ROUTING_MAX_CONCURRENT_EVENTS");
    std::env::remove_var("TEST_ROUTER_TOKEN");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let toml_content = format!(
        r#"
environment = "staging"

[application]
log_level = "debug"
dry_run = true
{ENDPOINTS}
[http]
timeout_seconds = 15
connect_timeout_seconds = 5
tls_verify = true
auth_token = "static-token"

[http.retry]
max_retries = 4
initial_delay_ms = 100
max_delay_ms = 2000
backoff_multiplier = 1.5

[routing]
max_concurrent_events = 16

[logging]
local_enabled = true
local_path = "/tmp/patient-router"
local_rotation = "hourly"
"#
    );

    let temp_file = write_config(&toml_content);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(
        config.endpoints.consumer_patient_cans_url,
        "https://consumer.example.com/patient/cans"
    );
    assert_eq!(config.http.timeout_seconds, 15);
    assert_eq!(config.http.connect_timeout_seconds, 5);
    assert_eq!(
        config.http.auth_token.as_ref().unwrap().expose_secret(),
        "static-token"
    );
    assert_eq!(config.http.retry.max_retries, 4);
    assert_eq!(config.http.retry.backoff_multiplier, 1.5);
    assert_eq!(config.routing.max_concurrent_events, 16);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(ENDPOINTS);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.http.timeout_seconds, 30);
    assert!(config.http.tls_verify);
    assert!(config.http.auth_token.is_none());
    assert_eq!(config.http.retry.max_retries, 3);
    assert_eq!(config.routing.max_concurrent_events, 8);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("TEST_ROUTER_TOKEN", "substituted-token");
    let toml_content = format!(
        r#"{ENDPOINTS}
[http]
# auth_token = "${{UNSET_IN_COMMENT}}"
auth_token = "${{TEST_ROUTER_TOKEN}}"
"#
    );

    let temp_file = write_config(&toml_content);
    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(
        config.http.auth_token.as_ref().unwrap().expose_secret(),
        "substituted-token"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let toml_content = format!(
        r#"{ENDPOINTS}
[http]
auth_token = "${{TEST_ROUTER_TOKEN}}"
"#
    );

    let temp_file = write_config(&toml_content);
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_ROUTER_TOKEN"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("PATIENT_ROUTER_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("PATIENT_ROUTER_APPLICATION_DRY_RUN", "true");
    std::env::set_var(
        "PATIENT_ROUTER_ENDPOINTS_CIH_REFERRAL_URL",
        "https://override.example.com/referral",
    );
    std::env::set_var("PATIENT_ROUTER_HTTP_TIMEOUT_SECONDS", "7");
    std::env::set_var("PATIENT_ROUTER_HTTP_AUTH_TOKEN", "env-token");
    std::env::set_var("PATIENT_ROUTER_ROUTING_MAX_CONCURRENT_EVENTS", "2");

    let temp_file = write_config(ENDPOINTS);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "warn");
    assert!(config.application.dry_run);
    assert_eq!(
        config.endpoints.cih_referral_url,
        "https://override.example.com/referral"
    );
    assert_eq!(config.http.timeout_seconds, 7);
    assert_eq!(
        config.http.auth_token.as_ref().unwrap().expose_secret(),
        "env-token"
    );
    assert_eq!(config.routing.max_concurrent_events, 2);

    cleanup_env_vars();
}

#[test]
fn test_override_is_validated() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("PATIENT_ROUTER_APPLICATION_LOG_LEVEL", "verbose");

    let temp_file = write_config(ENDPOINTS);
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid log_level"));

    cleanup_env_vars();
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        (
            ENDPOINTS.replace(
                "https://cih.example.com/referral",
                "https://cih.example.com/referral?tenant=1",
            ),
            "query string",
        ),
        (
            format!("environment = \"production\"\n{ENDPOINTS}\n[http]\ntls_verify = false\n"),
            "cannot be disabled in production",
        ),
        (
            format!("{ENDPOINTS}\n[http.retry]\nmax_retries = 0\n"),
            "max_retries",
        ),
        (
            format!("{ENDPOINTS}\n[routing]\nmax_concurrent_events = 0\n"),
            "max_concurrent_events",
        ),
        (
            format!("{ENDPOINTS}\n[logging]\nlocal_rotation = \"weekly\"\n"),
            "local_rotation",
        ),
    ];

    for (contents, expected) in cases {
        let temp_file = write_config(&contents);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "expected '{expected}' in '{err}'"
        );
    }
}

#[test]
fn test_missing_endpoints_section() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config("[application]\nlog_level = \"info\"\n");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}
