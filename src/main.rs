mod config;
mod derive;
mod error;
mod extract;
mod ids;
mod session;
mod store;
mod types;
mod worker;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config, EnvSettings};
use crate::error::Result;
use crate::ids::resolve_ids;
use crate::session::ChromeSessionFactory;
use crate::store::CsvStore;
use crate::worker::{PoolSettings, WorkerPool};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let cfg = match Config::from_cli(cli, EnvSettings::from_env()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error entering the arguments: {e}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(if e.is_run_fatal() { 2 } else { 1 });
    }
}

async fn run(cfg: Config) -> Result<()> {
    let started = Instant::now();

    // --- Work list ---
    let ids = resolve_ids(&cfg).await?;
    info!(
        "Resolved {} match ids ({:?}), writing to {}",
        ids.count(),
        cfg.mode,
        cfg.output_path.display()
    );

    // --- Workers ---
    let store = Arc::new(CsvStore::new(&cfg.output_path));
    let factory = ChromeSessionFactory::new(&cfg);
    let pool = WorkerPool::new(PoolSettings::from_config(&cfg), factory, Arc::clone(&store));
    let summary = pool.run(ids).await;

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        attempted = summary.attempted,
        saved = summary.saved,
        failed = summary.failed,
        "Finished in: {elapsed:.1} seconds / {:.2} minutes ({} rows added to {})",
        elapsed / 60.0,
        summary.saved,
        store.path().display(),
    );

    Ok(())
}
