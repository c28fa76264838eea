//! Cryptography module - SHA-256 block hashing

mod hash;

pub use hash::*;
