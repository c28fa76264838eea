//! Command-line configuration for `bookchain-node`

use clap::Parser;
use std::net::SocketAddr;
use bookchain_core::constants::DEFAULT_BIND;
use crate::logging::LogFormat;

/// Bookchain node: an in-memory hash-chained ledger of book check-outs.
#[derive(Parser, Debug)]
#[command(name = "bookchain-node", version, about)]
pub struct Cli {
    /// Address the HTTP API listens on
    #[arg(long, short = 'b', env = "BOOKCHAIN_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "BOOKCHAIN_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "BOOKCHAIN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}
