use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::EnvSettings;
use database::{fixed_query, format_rows, DbGateway, QUERY_COUNT};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// The main entry point for the academics query application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load POSTGRES_* from a .env file if there is one; the real environment wins.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // The terminal belongs to the UI, so logs go to a file.
    let _log_guard = init_tracing(&cli.log_dir)?;

    // Built once and handed to the gateway; read again on every connection attempt.
    let settings = Arc::new(EnvSettings::new());
    let gateway = DbGateway::new(settings);

    // Execute the appropriate command
    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => shell::run(gateway).await?,
        Commands::Queries => print_catalog(),
        Commands::Run { index } => handle_run(gateway, index as usize).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Runs a fixed set of SQL queries against the `academics` table.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory for the daily rolling log file.
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive window (the default).
    Ui,
    /// List the fixed queries and their trigger numbers.
    Queries,
    /// Run one fixed query without the window and print its rows.
    Run {
        /// The trigger number of the query.
        #[arg(value_parser = clap::value_parser!(u8).range(0..QUERY_COUNT as i64))]
        index: u8,
    },
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn init_tracing(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, "academics.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn print_catalog() {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Control", "SQL"]);

    for (index, binding) in shell::default_bindings().into_iter().enumerate() {
        table.add_row(vec![index.to_string(), binding.label, binding.query.to_string()]);
    }

    println!("{table}");
}

/// Headless counterpart of pressing one trigger control.
async fn handle_run(mut gateway: DbGateway, index: usize) -> anyhow::Result<()> {
    let query = fixed_query(index).context("unknown query index")?;

    // Same order as the window: a schema failure is reported but does not stop the query.
    if let Err(e) = gateway.ensure_schema().await {
        tracing::warn!(error = %e, "Schema setup failed.");
        eprintln!("{e}");
    }
    let outcome = gateway.execute(query).await;
    gateway.close().await;

    let rows = outcome?;
    tracing::info!(index, rows = rows.len(), "Headless query finished.");
    if !rows.is_empty() {
        println!("{}", format_rows(&rows));
    }
    Ok(())
}
