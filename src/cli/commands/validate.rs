//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the router configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Endpoints:");
        for (name, url) in config.endpoints.entries() {
            println!("    {name}: {url}");
        }
        println!("  HTTP Timeout: {}s", config.http.timeout_seconds);
        println!("  TLS Verify: {}", config.http.tls_verify);
        println!(
            "  Bearer Token: {}",
            if config.http.auth_token.is_some() {
                "configured"
            } else {
                "none"
            }
        );
        println!("  Max Retries: {}", config.http.retry.max_retries);
        println!(
            "  Concurrent Events: {}",
            config.routing.max_concurrent_events
        );
        println!();
        Ok(0)
    }
}
