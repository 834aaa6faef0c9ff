mod config;
mod db;
mod error;
mod export;
mod format;
mod ledger;
mod models;
mod rollover;
mod run;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    setup_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        run::print_usage();
        return Ok(());
    }

    let config = config::Config::from_env()?;
    let mut db = db::Database::open(&config.db_path)?;
    run::as_cli(&args, &mut db)
}

/// Logs go to stderr so command output on stdout stays clean.
fn setup_logging() {
    let filter = EnvFilter::try_from_env(config::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
