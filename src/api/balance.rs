// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance query endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use super::parse_address;
use crate::{
    blockchain::with_deadline, error::ApiError, models::BalanceResponse, state::AppState,
};

/// Get the FIL and iFIL balances of an address.
///
/// Balances are read from the ledger on every call and rendered exactly
/// (raw value / 10^18).
#[utoipa::path(
    get,
    path = "/balance/{address}",
    tag = "Balance",
    params(
        ("address" = String, Path, description = "Wallet address (0x-prefixed)")
    ),
    responses(
        (status = 200, description = "Balances retrieved", body = BalanceResponse),
        (status = 400, description = "Malformed address"),
        (status = 500, description = "Ledger unavailable")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let address = parse_address(&address).ok_or_else(|| ApiError::bad_request("invalid address"))?;

    let balance = with_deadline(state.ledger_timeout, state.ledger.get_balances(address)).await?;

    Ok(Json(BalanceResponse {
        fil: balance.fil(),
        ifil: balance.ifil(),
    }))
}
