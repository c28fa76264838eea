//! Book records
//!
//! Books are not stored on the chain. Registering one only mints its
//! identifier, which clients then reference from check-out events.

use serde::{Deserialize, Serialize};

/// A catalogued book
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Minted by `Book::with_id`; any client-supplied value is replaced
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "publishedDate")]
    pub published_date: String,
    pub isbn: String,
}

impl Book {
    /// Return the book with its content-derived id filled in
    pub fn with_id(mut self) -> Self {
        self.id = book_id(&self.isbn, &self.published_date);
        self
    }
}

/// Deterministic identifier for a book: BLAKE3 hex of `isbn || published_date`
pub fn book_id(isbn: &str, published_date: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(isbn.as_bytes());
    hasher.update(published_date.as_bytes());
    hasher.finalize().to_hex().to_string()
}
