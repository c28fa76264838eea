//! Bookchain Core Library
//!
//! An append-only, hash-chained ledger of library book check-outs,
//! served over HTTP. Single process, in memory.

pub mod consensus;
pub mod crypto;
pub mod storage;
pub mod books;
pub mod rpc;

/// Protocol constants
pub mod constants {
    /// Chain name used in logs
    pub const CHAIN_NAME: &str = "bookchain";

    /// Default HTTP listen address
    pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
}
