// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints: submit a FIL transfer, list and look up records.

use alloy::primitives::B256;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use super::parse_address;
use crate::{
    blockchain::ScopedSigner,
    error::ApiError,
    models::{SubmitTransactionRequest, SubmitTransactionResponse, TransactionListQuery},
    state::AppState,
    storage::StoredTransaction,
    submission::parse_amount,
};

// =============================================================================
// Handlers
// =============================================================================

/// Sign and broadcast a native FIL transfer, then record it as pending.
///
/// The private key is used for this transfer only and is never stored.
#[utoipa::path(
    post,
    path = "/transaction/send",
    tag = "Transactions",
    request_body = SubmitTransactionRequest,
    responses(
        (status = 201, description = "Transfer broadcast and recorded", body = SubmitTransactionResponse),
        (status = 400, description = "Malformed body, key, receiver or amount"),
        (status = 500, description = "Broadcast or persistence failure")
    )
)]
pub async fn send_transaction(
    State(state): State<AppState>,
    payload: Result<Json<SubmitTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitTransactionResponse>), ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("invalid request format"))?;
    let signer = ScopedSigner::from_hex(&request.private_key_hex)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let receiver = parse_address(&request.receiver)
        .ok_or_else(|| ApiError::bad_request("invalid receiver address"))?;
    let amount = parse_amount(&request.amount)?;

    let hash = state.submissions.submit(&signer, receiver, amount).await?;

    Ok((StatusCode::CREATED, Json(SubmitTransactionResponse { hash })))
}

/// List recorded transfers, optionally filtered by sender and/or receiver.
///
/// Returns at most 100 records in insertion order.
#[utoipa::path(
    get,
    path = "/transactions/",
    tag = "Transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Transaction list", body = [StoredTransaction]),
        (status = 400, description = "Malformed filter address or offset"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<TransactionListQuery>, QueryRejection>,
) -> Result<Json<Vec<StoredTransaction>>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::bad_request("invalid query parameters"))?;
    let sender = filter_address(query.sender.as_deref(), "invalid sender address")?;
    let receiver = filter_address(query.receiver.as_deref(), "invalid receiver address")?;

    let records = state
        .store
        .get_transactions(&sender, &receiver, query.offset.unwrap_or(0))
        .await?;

    Ok(Json(records))
}

/// Get one recorded transfer, settling its status first if it is still
/// pending and the ledger has a receipt for it.
#[utoipa::path(
    get,
    path = "/transaction/{hash}",
    tag = "Transactions",
    params(
        ("hash" = String, Path, description = "Transaction hash (0x-prefixed)")
    ),
    responses(
        (status = 200, description = "Transaction record", body = StoredTransaction),
        (status = 400, description = "Malformed hash"),
        (status = 404, description = "Unknown transaction"),
        (status = 500, description = "Ledger or storage failure")
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<StoredTransaction>, ApiError> {
    let hash: B256 = hash
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("invalid transaction hash"))?;

    state
        .submissions
        .refresh_status(hash)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("transaction not found"))
}

// =============================================================================
// Helpers
// =============================================================================

/// Normalize an optional filter; absent or empty means no filter.
fn filter_address(raw: Option<&str>, message: &'static str) -> Result<String, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(String::new()),
        Some(raw) => parse_address(raw)
            .map(|addr| addr.to_string().to_lowercase())
            .ok_or_else(|| ApiError::bad_request(message)),
    }
}
