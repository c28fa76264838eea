//! Bookchain Node
//!
//! Main entry point: builds the ledger and serves it over HTTP.

mod cli;
mod logging;

use anyhow::{Context, Result};
use bookchain_core::constants::CHAIN_NAME;
use bookchain_core::rpc::start_rpc_server;
use bookchain_core::storage::Ledger;
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let ledger = Arc::new(Ledger::new());

    let genesis = ledger.tail();
    tracing::info!(
        chain = CHAIN_NAME,
        hash = %genesis.hash,
        previous_hash = %genesis.previous_hash,
        timestamp = %genesis.timestamp,
        "genesis block"
    );
    let stats = ledger.stats();
    tracing::info!(height = stats.height, tip = %stats.tip_hash, blocks = stats.block_count, "chain state");

    start_rpc_server(ledger.clone(), cli.bind, shutdown_signal())
        .await
        .with_context(|| format!("http server on {} failed", cli.bind))?;

    let stats = ledger.stats();
    tracing::info!(height = stats.height, verified = ledger.verify(), "node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, keep serving until killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
