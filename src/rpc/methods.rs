//! HTTP Handlers
//!
//! Each handler decodes its request, calls into the ledger, and maps the
//! outcome onto a status code.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use crate::books::Book;
use crate::consensus::{Block, Checkout, RejectReason};
use crate::storage::Ledger;

/// Handler state
pub type RpcState = Arc<Ledger>;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not decode request body: {0}")]
    Decode(#[from] JsonRejection),
    #[error("block rejected: {0}")]
    Rejected(#[from] RejectReason),
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Body of `POST /writeBlock`
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub user: String,
    #[serde(rename = "checkoutDate", default)]
    pub checkout_date: String,
}

impl From<CheckoutRequest> for Checkout {
    fn from(req: CheckoutRequest) -> Self {
        Checkout::new(req.book_id, req.user, req.checkout_date)
    }
}

/// Body of `GET /validate`
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub ok: bool,
    pub height: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /` - every block, genesis first
pub async fn get_chain(State(ledger): State<RpcState>) -> Json<Vec<Block>> {
    Json(ledger.snapshot())
}

/// `POST /new` - mint a book id and echo the record
pub async fn create_book(payload: Result<Json<Book>, JsonRejection>) -> Result<Json<Book>, ApiError> {
    let Json(book) = payload?;
    let book = book.with_id();
    tracing::info!(id = %book.id, isbn = %book.isbn, "book registered");
    Ok(Json(book))
}

/// `POST /writeBlock` - append a check-out event to the chain
pub async fn write_block(
    State(ledger): State<RpcState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<Block>, ApiError> {
    let Json(request) = payload?;
    let block = ledger.append(request.into())?;
    Ok(Json(block))
}

/// `GET /validate` - audit the whole chain
pub async fn validate_chain(State(ledger): State<RpcState>) -> Json<ValidateResponse> {
    let height = ledger.stats().height;
    let error = ledger.audit().err().map(|violation| violation.to_string());
    Json(ValidateResponse {
        ok: error.is_none(),
        height,
        error,
    })
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
