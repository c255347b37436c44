// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transaction Storage Module
//!
//! Durable record of every transfer the gateway has broadcast, kept in an
//! embedded redb database.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATABASE_DSN}            # single redb file
//!   transactions            # hash -> record (JSON)
//!   transactions_by_id      # id -> hash
//!   sender_index            # sender|id -> hash
//!   receiver_index          # receiver|id -> hash
//!   sequences               # id allocator
//! ```
//!
//! ## Write Rules
//!
//! - Records are unique by hash
//! - A record may only change while its status is `pending`, and then only
//!   its status
//! - Writes against a `confirmed` or `failed` record are rejected with
//!   [`TxDbError::AlreadyFinalized`]

use async_trait::async_trait;

pub mod repository;
pub mod tx_database;

pub use repository::{StoredTransaction, TransactionRepository, TxStatus};
pub use tx_database::{TxDatabase, TxDbError, TxDbResult, PAGE_SIZE};

/// Async access to persisted transaction records.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a record, or settle the status of a pending one.
    async fn save_transaction(&self, tx: StoredTransaction) -> TxDbResult<StoredTransaction>;

    /// Up to [`PAGE_SIZE`] records in insertion order, skipping `offset`.
    /// Empty filters match everything.
    async fn get_transactions(
        &self,
        sender: &str,
        receiver: &str,
        offset: usize,
    ) -> TxDbResult<Vec<StoredTransaction>>;

    async fn get_transaction(&self, hash: &str) -> TxDbResult<Option<StoredTransaction>>;
}
