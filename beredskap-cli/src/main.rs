//! ## beredskap-cli
//! **Unified operational interface**
//!
//! Entrypoint for running scripted failover scenarios, replaying recorded
//! ones, and the auxiliary cost/MTTR/comparison calculators.

use clap::Parser;

use beredskap_telemetry::logging::EventLogger;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    EventLogger::init();
    let cli = Cli::parse();
    commands::run_command(cli).await
}
