//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the router using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Patient Router - patient event routing to the clinical integration hub
#[derive(Parser, Debug)]
#[command(name = "patient-router")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "patient-router.toml",
        env = "PATIENT_ROUTER_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PATIENT_ROUTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route a stream of newline-delimited JSON events
    Route(commands::route::RouteArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
