// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction building for native FIL transfers.
//!
//! This module holds the pricing heuristic (tip + fixed buffer, 50% gas
//! margin) and the EIP-1559 transfer construction used by the ledger client,
//! plus amount formatting helpers.

use alloy::{
    consensus::TxEip1559,
    primitives::{Address, TxKind, U256},
    rpc::types::TransactionRequest,
};

/// Fixed buffer added on top of the suggested tip to form the fee cap (2 gwei).
pub const PRIORITY_FEE_BUFFER: u128 = 2_000_000_000;

/// Fee parameters resolved for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeParams {
    /// Max priority fee per gas (tip)
    pub max_priority_fee_per_gas: u128,
    /// Max fee per gas (tip + buffer)
    pub max_fee_per_gas: u128,
}

impl FeeParams {
    /// Derive the fee cap from a tip suggestion.
    pub fn from_tip(tip: u128) -> Self {
        Self {
            max_priority_fee_per_gas: tip,
            max_fee_per_gas: tip.saturating_add(PRIORITY_FEE_BUFFER),
        }
    }
}

/// Inflate an estimated gas limit by 50% to avoid out-of-gas failures.
pub fn inflate_gas_limit(estimated: u64) -> u64 {
    estimated.saturating_add(estimated / 2)
}

/// Request used to estimate the gas of a plain value transfer.
pub fn native_transfer_request(from: Address, to: Address, value: U256) -> TransactionRequest {
    TransactionRequest::default().from(from).to(to).value(value)
}

/// Build an unsigned EIP-1559 value transfer.
pub fn build_native_transfer(
    chain_id: u64,
    nonce: u64,
    fees: FeeParams,
    gas_limit: u64,
    to: Address,
    value: U256,
) -> TxEip1559 {
    TxEip1559 {
        chain_id,
        nonce,
        gas_limit,
        max_fee_per_gas: fees.max_fee_per_gas,
        max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        to: TxKind::Call(to),
        value,
        ..Default::default()
    }
}

/// Format attoFIL (or token units) to a human-readable amount.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}
