//! HTTP API Module
//!
//! Thin transport over the ledger: list the chain, register books, and
//! append check-out events.

mod methods;
mod server;

pub use methods::*;
pub use server::*;
