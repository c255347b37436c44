// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for the Filecoin FEVM.
//!
//! This module provides functionality for:
//! - Querying native FIL balances
//! - Querying iFIL (wrapped FIL) ERC-20 balances
//! - Pricing, signing and broadcasting FIL and iFIL transfers
//! - Reading transfer receipts

pub mod client;
pub mod erc20;
pub mod signing;
pub mod transactions;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use client::{with_deadline, FilecoinClient, LedgerClient, LedgerError};
pub use signing::{InvalidKey, ScopedSigner};
pub use transactions::format_amount;
pub use types::*;
