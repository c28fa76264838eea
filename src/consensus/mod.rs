//! Consensus module - Block structure, construction, and validation

mod block;
mod factory;
mod validation;

pub use block::*;
pub use factory::*;
pub use validation::*;
