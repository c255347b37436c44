// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction repository: record types and the async store over redb.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::tx_database::{TxDatabase, TxDbResult};
use super::super::TransactionStore;

/// Transaction status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Transaction has been broadcast but not yet settled
    #[default]
    Pending,
    /// Transaction has been confirmed in a block
    Confirmed,
    /// Transaction failed or was reverted
    Failed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Confirmed => "confirmed",
            TxStatus::Failed => "failed",
        }
    }

    /// Confirmed and failed records can no longer change.
    pub fn is_final(&self) -> bool {
        !matches!(self, TxStatus::Pending)
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredTransaction {
    /// Surrogate key assigned on first insert
    pub id: u64,
    /// Transaction hash (0x prefixed, lower case)
    pub hash: String,
    /// Sender address (lower case)
    pub sender: String,
    /// Receiver address (lower case)
    pub receiver: String,
    /// Amount in attoFIL
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "1000000000000000000")]
    pub amount: Decimal,
    /// When the record was first stored
    pub timestamp: DateTime<Utc>,
    /// Current transaction status
    pub status: TxStatus,
}

impl StoredTransaction {
    /// Create a new pending transaction record.
    ///
    /// Addresses are lower-cased; `id` and `timestamp` are assigned by the
    /// store on first insert.
    pub fn new_pending(hash: String, sender: &str, receiver: &str, amount: Decimal) -> Self {
        Self {
            id: 0,
            hash,
            sender: sender.to_lowercase(),
            receiver: receiver.to_lowercase(),
            amount,
            timestamp: Utc::now(),
            status: TxStatus::Pending,
        }
    }

    /// Same record with a different status.
    pub fn with_status(mut self, status: TxStatus) -> Self {
        self.status = status;
        self
    }
}

/// Async store backed by the embedded redb database.
///
/// redb calls are blocking, so each one runs on the blocking thread pool.
#[derive(Clone)]
pub struct TransactionRepository {
    db: Arc<TxDatabase>,
}

impl TransactionRepository {
    /// Create a new TransactionRepository.
    pub fn new(db: Arc<TxDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn save_transaction(&self, tx: StoredTransaction) -> TxDbResult<StoredTransaction> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.save_transaction(&tx)).await?
    }

    async fn get_transactions(
        &self,
        sender: &str,
        receiver: &str,
        offset: usize,
    ) -> TxDbResult<Vec<StoredTransaction>> {
        let db = Arc::clone(&self.db);
        let sender = sender.to_string();
        let receiver = receiver.to_string();
        tokio::task::spawn_blocking(move || db.list_transactions(&sender, &receiver, offset)).await?
    }

    async fn get_transaction(&self, hash: &str) -> TxDbResult<Option<StoredTransaction>> {
        let db = Arc::clone(&self.db);
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || db.get_transaction(&hash)).await?
    }
}
