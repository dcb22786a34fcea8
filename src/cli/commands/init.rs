//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "patient-router.toml")]
    pub output: String,

    /// Include every setting with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing patient router configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your endpoint URLs", self.output);
                println!("  2. Put the bearer token in a .env file:");
                println!("     - Set PATIENT_ROUTER_HTTP_AUTH_TOKEN");
                println!("  3. Validate configuration: patient-router validate-config");
                println!("  4. Try a dry run: patient-router route --dry-run --input events.ndjson");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Patient Router Configuration File

environment = "development"  # development | staging | production

[application]
log_level = "info"
dry_run = false

[endpoints]
cih_integration_url = "https://cih.example.com/integration"
cih_referral_url = "https://cih.example.com/referral"
consumer_patient_url = "https://consumer.example.com/integration/patient"
consumer_patient_cans_url = "https://consumer.example.com/integration/patient/cans"
consumer_contact_info_url = "https://consumer.example.com/integration/patient/contact"
configuration_value_url = "https://configuration.example.com/configurations/value"
configuration_organization_url = "https://configuration.example.com/organizations/genealogy"
"#
        .to_string()
    }

    /// Generate configuration with every section documented
    fn generate_config_with_examples() -> String {
        r#"# Patient Router Configuration File
#
# Values can reference environment variables with ${VAR_NAME}, and any
# setting can be overridden with a PATIENT_ROUTER_<SECTION>_<KEY> variable,
# e.g. PATIENT_ROUTER_HTTP_TIMEOUT_SECONDS=10.

# Deployment environment (development | staging | production)
# Production rejects http.tls_verify = false
environment = "development"

[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

# Record dispatches instead of sending them (patient lookups still run)
dry_run = false

[endpoints]
# Integration hub endpoints receiving routed messages
cih_integration_url = "https://cih.example.com/integration"
cih_referral_url = "https://cih.example.com/referral"

# Consumer service lookups
consumer_patient_url = "https://consumer.example.com/integration/patient"
consumer_patient_cans_url = "https://consumer.example.com/integration/patient/cans"
consumer_contact_info_url = "https://consumer.example.com/integration/patient/contact"

# Configuration service lookups
configuration_value_url = "https://configuration.example.com/configurations/value"
configuration_organization_url = "https://configuration.example.com/organizations/genealogy"

[http]
# Per-request timeout
timeout_seconds = 30
connect_timeout_seconds = 10

# Verify TLS certificates (must stay true in production)
tls_verify = true

# Bearer token sent with every request
# auth_token = "${PATIENT_ROUTER_TOKEN}"

[http.retry]
# Total attempts for connection errors, timeouts and 5xx responses
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

[routing]
# Events routed concurrently by the route command
max_concurrent_events = 8

[logging]
# JSON file logging in addition to the console
local_enabled = false
local_path = "/var/log/patient-router"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}
