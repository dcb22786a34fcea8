//! Route command implementation
//!
//! This module implements the `route` command, which feeds a stream of
//! newline-delimited JSON events through the router. It stands in for the
//! queue consumer: every line is one delivery, routed concurrently up to
//! `routing.max_concurrent_events`.

use crate::adapters::http::{HttpCihGateway, HttpClient, HttpConfigurationLookup};
use crate::adapters::memory::RecordingGateway;
use crate::adapters::traits::CihGateway;
use crate::config::{load_config, RouterConfig};
use crate::core::routing::EventRouter;
use crate::domain::{PatientEvent, Result, RouteOutcome};
use clap::Args;
use futures::stream::{self, StreamExt};
use reqwest::header::HeaderName;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;

/// Arguments for the route command
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// File of newline-delimited JSON events (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Dry run mode - record outbound dispatches instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Inbound header applied to every event (repeatable)
    #[arg(long = "header", value_name = "NAME=VALUE")]
    pub headers: Vec<String>,

    /// Override the number of events routed concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Counts gathered while routing a stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSummary {
    /// Non-blank input lines
    pub total_events: usize,

    /// Lines that were not a JSON object
    pub invalid: usize,

    pub dispatched: usize,
    pub rejected: usize,
    pub failed: usize,

    /// Individual gateway dispatches across all events
    pub dispatch_calls: usize,

    /// Routing stopped early on a shutdown signal
    pub interrupted: bool,
}

impl RouteSummary {
    pub fn record(&mut self, outcome: &RouteOutcome) {
        match outcome {
            RouteOutcome::Dispatched { dispatches } => {
                self.dispatched += 1;
                self.dispatch_calls += dispatches.len();
            }
            RouteOutcome::Rejected { .. } => self.rejected += 1,
            RouteOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.invalid == 0 && self.rejected == 0 && self.failed == 0 && !self.interrupted
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            130
        } else if self.is_successful() {
            0
        } else {
            1
        }
    }
}

impl RouteArgs {
    /// Execute the route command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting route command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Some(concurrency) = self.concurrency {
            tracing::info!(concurrency, "Overriding event concurrency from CLI");
            config.routing.max_concurrent_events = concurrency;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let headers = match parse_headers(&self.headers) {
            Ok(h) => h,
            Err(e) => {
                eprintln!("Invalid --header: {e}");
                return Ok(2);
            }
        };

        let (router, recorder) = match build_router(&config) {
            Ok(built) => built,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create router");
                eprintln!("Failed to initialize router: {e}");
                return Ok(2);
            }
        };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - dispatches are recorded, not sent");
            println!();
        }

        let input = self.read_input().await?;
        let events = parse_events(&input);

        let summary = route_events(
            &router,
            events,
            &headers,
            config.routing.max_concurrent_events,
            shutdown_signal,
        )
        .await;

        println!("📊 Routing Summary:");
        println!("  Total Events: {}", summary.total_events);
        println!("  Dispatched: {}", summary.dispatched);
        println!("  Dispatch Calls: {}", summary.dispatch_calls);
        println!("  Rejected: {}", summary.rejected);
        println!("  Failed: {}", summary.failed);
        println!("  Invalid: {}", summary.invalid);
        if let Some(recorder) = recorder {
            println!("  Recorded Calls: {}", recorder.calls().len());
        }
        println!();

        if summary.interrupted {
            println!("⚠️  Routing interrupted, remaining events were not routed");
        } else if summary.is_successful() {
            println!("✅ Routing completed successfully!");
        } else {
            println!("⚠️  Routing completed with failures");
        }

        Ok(summary.exit_code())
    }

    async fn read_input(&self) -> std::io::Result<String> {
        match &self.input {
            Some(path) => tokio::fs::read_to_string(path).await,
            None => {
                let mut input = String::new();
                tokio::io::stdin().read_to_string(&mut input).await?;
                Ok(input)
            }
        }
    }
}

/// Wire the HTTP facades, or a recording gateway over them in dry-run mode
fn build_router(config: &RouterConfig) -> Result<(EventRouter, Option<Arc<RecordingGateway>>)> {
    let client = HttpClient::new(&config.http)?;
    let live: Arc<dyn CihGateway> = Arc::new(HttpCihGateway::new(client.clone()));
    let lookup = Arc::new(HttpConfigurationLookup::new(client, &config.endpoints)?);

    let (gateway, recorder) = if config.application.dry_run {
        let recorder = Arc::new(RecordingGateway::new().with_reads_from(live));
        let gateway: Arc<dyn CihGateway> = recorder.clone();
        (gateway, Some(recorder))
    } else {
        (live, None)
    };

    let router = EventRouter::from_config(&config.endpoints, gateway, lookup)?;
    Ok((router, recorder))
}

/// Parse `NAME=VALUE` header arguments
pub fn parse_headers(raw: &[String]) -> std::result::Result<BTreeMap<String, String>, String> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                let name = name.trim();
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| format!("'{name}' is not a valid header name"))?;
                Ok((name.to_string(), value.trim().to_string()))
            }
            _ => Err(format!("expected NAME=VALUE, got '{entry}'")),
        })
        .collect()
}

/// Parse newline-delimited events, keeping 1-based line numbers
///
/// Blank lines are skipped.
pub fn parse_events(input: &str) -> Vec<(usize, Result<PatientEvent>)> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, PatientEvent::from_json(line)))
        .collect()
}

/// Route parsed events with bounded concurrency
///
/// Stops taking new events once `shutdown` turns true; events already in
/// flight are finished.
pub async fn route_events(
    router: &EventRouter,
    events: Vec<(usize, Result<PatientEvent>)>,
    headers: &BTreeMap<String, String>,
    concurrency: usize,
    shutdown: watch::Receiver<bool>,
) -> RouteSummary {
    let mut summary = RouteSummary::default();
    let mut valid = Vec::with_capacity(events.len());

    for (line, parsed) in events {
        summary.total_events += 1;
        match parsed {
            Ok(event) => valid.push((line, event)),
            Err(e) => {
                tracing::error!(line, error = %e, "Skipping malformed event");
                summary.invalid += 1;
            }
        }
    }

    let expected = valid.len();
    let outcomes: Vec<RouteOutcome> = stream::iter(valid)
        .take_while(|_| futures::future::ready(!*shutdown.borrow()))
        .map(|(line, event)| async move {
            let outcome = router.on_message(&event, headers).await;
            tracing::debug!(line, outcome = ?outcome, "Event routed");
            outcome
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    summary.interrupted = outcomes.len() < expected;
    for outcome in &outcomes {
        summary.record(outcome);
    }

    tracing::info!(
        total = summary.total_events,
        dispatched = summary.dispatched,
        rejected = summary.rejected,
        failed = summary.failed,
        invalid = summary.invalid,
        "Routing finished"
    );

    summary
}
