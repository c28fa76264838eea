//! Storage module - the in-memory chain ledger

mod ledger;

pub use ledger::*;
