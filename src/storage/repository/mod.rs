// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed async access to the transaction database.

pub mod transactions;

pub use transactions::{StoredTransaction, TransactionRepository, TxStatus};
