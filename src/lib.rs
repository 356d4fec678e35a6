//! PhotoVerse command-line front end.

pub mod bootstrap;
pub mod cli;
pub mod commands;

use std::io;

use tracing::info;

use crate::cli::Cli;

/// Resolves config, sets up logging, wires the application and runs one
/// command against it.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = bootstrap::config::resolve_config(cli.config.as_deref())?;

    if let Err(err) = bootstrap::tracing::init_tracing_subscriber(&config.data_dir.join("logs")) {
        eprintln!("Failed to initialize tracing: {err:#}");
    }
    info!(data_dir = %config.data_dir.display(), "PhotoVerse starting");

    let app = bootstrap::wiring::build_app(&config);
    let mut stdout = io::stdout().lock();
    let result = commands::execute(&app, cli.command, &mut stdout).await;
    app.shutdown().await;
    result
}
