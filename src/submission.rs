// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transfer Submission
//!
//! Drives a native FIL transfer from validated input to a persisted record:
//!
//! 1. Reject non-positive or unrepresentable amounts (no network traffic)
//! 2. Price, sign and broadcast through the [`LedgerClient`]
//! 3. Record the transfer as `pending` through the [`TransactionStore`]
//!
//! A transfer that was broadcast but could not be recorded is reported as
//! [`SubmitError::Persistence`] carrying the hash, so it can be reconciled
//! by hand.

use std::{str::FromStr, sync::Arc, time::Duration};

use alloy::primitives::{Address, B256, U256};
use rust_decimal::Decimal;

use crate::blockchain::{with_deadline, LedgerClient, LedgerError, ScopedSigner, TransferOutcome};
use crate::storage::{StoredTransaction, TransactionStore, TxDbError, TxStatus};

/// Errors surfaced by the submission flow.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid tx amount: must be positive value")]
    InvalidAmount,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The transfer is on the network but has no local record.
    #[error("transaction {hash} was broadcast but could not be recorded: {source}")]
    Persistence {
        hash: String,
        #[source]
        source: TxDbError,
    },

    #[error("storage error: {0}")]
    Storage(#[from] TxDbError),
}

/// Parse a base-10 amount of attoFIL.
///
/// Zero, negative, fractional and malformed inputs are all `InvalidAmount`,
/// as are values too large to be stored as a decimal.
pub fn parse_amount(raw: &str) -> Result<U256, SubmitError> {
    let digits = raw.trim();
    // from_str_radix tolerates `_` separators; only plain digits are accepted.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubmitError::InvalidAmount);
    }
    let amount = U256::from_str_radix(digits, 10).map_err(|_| SubmitError::InvalidAmount)?;
    if amount.is_zero() {
        return Err(SubmitError::InvalidAmount);
    }
    to_decimal(amount)?;
    Ok(amount)
}

fn to_decimal(amount: U256) -> Result<Decimal, SubmitError> {
    Decimal::from_str(&amount.to_string()).map_err(|_| SubmitError::InvalidAmount)
}

/// Submission orchestrator shared by all requests.
pub struct SubmissionService {
    ledger: Arc<dyn LedgerClient>,
    store: Arc<dyn TransactionStore>,
    ledger_timeout: Duration,
}

impl SubmissionService {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn TransactionStore>,
        ledger_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            store,
            ledger_timeout,
        }
    }

    /// Broadcast a native transfer of `amount` attoFIL and record it as pending.
    ///
    /// Returns the 0x-prefixed transaction hash.
    pub async fn submit(
        &self,
        signer: &ScopedSigner,
        receiver: Address,
        amount: U256,
    ) -> Result<String, SubmitError> {
        if amount.is_zero() {
            return Err(SubmitError::InvalidAmount);
        }
        let stored_amount = to_decimal(amount)?;
        let sender = signer.address();

        let handle = with_deadline(
            self.ledger_timeout,
            self.ledger.submit_native_transfer(signer, receiver, amount),
        )
        .await
        .inspect_err(|e| {
            tracing::warn!(sender = %sender, receiver = %receiver, error = %e, "Transfer submission failed");
        })?;

        let hash = handle.hash_hex();
        tracing::info!(hash = %hash, sender = %sender, receiver = %receiver, amount = %amount, "Transfer broadcast");

        let record = StoredTransaction::new_pending(
            hash.clone(),
            &sender.to_string(),
            &receiver.to_string(),
            stored_amount,
        );

        if let Err(source) = self.store.save_transaction(record).await {
            tracing::error!(
                hash = %hash,
                error = %source,
                "Broadcast transaction could not be recorded"
            );
            return Err(SubmitError::Persistence { hash, source });
        }

        Ok(hash)
    }

    /// Current record for `hash`, settling it first if it is still pending
    /// and the ledger has a receipt.
    pub async fn refresh_status(
        &self,
        hash: B256,
    ) -> Result<Option<StoredTransaction>, SubmitError> {
        let hash_hex = alloy::hex::encode_prefixed(hash);

        let Some(record) = self.store.get_transaction(&hash_hex).await? else {
            return Ok(None);
        };
        if record.status.is_final() {
            return Ok(Some(record));
        }

        let outcome = with_deadline(self.ledger_timeout, self.ledger.transfer_outcome(hash)).await?;
        let status = match outcome {
            Some(TransferOutcome::Confirmed) => TxStatus::Confirmed,
            Some(TransferOutcome::Failed) => TxStatus::Failed,
            None => return Ok(Some(record)),
        };

        match self.store.save_transaction(record.with_status(status)).await {
            Ok(settled) => {
                tracing::info!(hash = %hash_hex, status = %settled.status, "Transaction settled");
                Ok(Some(settled))
            }
            // Settled concurrently by another request.
            Err(e) if e.is_already_finalized() => {
                Ok(self.store.get_transaction(&hash_hex).await?)
            }
            Err(e) => Err(e.into()),
        }
    }
}
