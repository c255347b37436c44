// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Stored transaction records
//! are returned as-is and live in [`crate::storage`].

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Balances
// =============================================================================

/// FIL and iFIL balances in whole-token units.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BalanceResponse {
    /// Native FIL balance
    #[schema(example = "1.5")]
    pub fil: String,
    /// Wrapped FIL (iFIL) balance
    #[schema(example = "0")]
    pub ifil: String,
}

// =============================================================================
// Transfers
// =============================================================================

/// Request body for a native FIL transfer.
///
/// The key is used to sign this one transfer and is never stored.
#[derive(Clone, Deserialize, ToSchema)]
pub struct SubmitTransactionRequest {
    /// Sender's secp256k1 private key, hex encoded (`0x` optional)
    pub private_key_hex: String,
    /// Receiver address (0x-prefixed, 40 hex characters)
    #[schema(example = "0xFFEEDDCcBbAA0000000000000000000000000000")]
    pub receiver: String,
    /// Amount in attoFIL as a base-10 integer string
    #[schema(example = "1000000000000000000")]
    pub amount: String,
}

impl fmt::Debug for SubmitTransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitTransactionRequest")
            .field("private_key_hex", &"<redacted>")
            .field("receiver", &self.receiver)
            .field("amount", &self.amount)
            .finish()
    }
}

/// Response for an accepted transfer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitTransactionResponse {
    /// Transaction hash (0x-prefixed)
    pub hash: String,
}

/// Filters for the transaction listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TransactionListQuery {
    /// Only transfers sent by this address
    pub sender: Option<String>,
    /// Only transfers received by this address
    pub receiver: Option<String>,
    /// Number of matching records to skip
    #[param(default = 0)]
    pub offset: Option<usize>,
}
