// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded transaction database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `transactions`: hash → serialized StoredTransaction (unique by hash)
//! - `transactions_by_id`: id → hash (insertion order)
//! - `sender_index`: composite key (sender|id_be) → hash
//! - `receiver_index`: composite key (receiver|id_be) → hash
//! - `sequences`: name → last assigned id
//!
//! redb admits one write transaction at a time, so the read-check-write in
//! [`TxDatabase::save_transaction`] is atomic with respect to concurrent saves.

use std::path::Path;

use chrono::Utc;
use redb::{
    Database, ReadOnlyTable, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};

use super::repository::transactions::{StoredTransaction, TxStatus};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: hash → serialized StoredTransaction (JSON bytes).
const TRANSACTIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("transactions");

/// Insertion order: id → hash.
const TRANSACTIONS_BY_ID: TableDefinition<u64, &str> = TableDefinition::new("transactions_by_id");

/// Index: `sender|id_be` → hash.
const SENDER_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("sender_index");

/// Index: `receiver|id_be` → hash.
const RECEIVER_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("receiver_index");

/// Sequences: name → last assigned value.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const TRANSACTION_SEQUENCE: &str = "transactions";

/// Maximum number of records returned by one listing call.
pub const PAGE_SIZE: usize = 100;

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TxDbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("transaction {hash} is already {current} and cannot become {requested}")]
    AlreadyFinalized {
        hash: String,
        current: TxStatus,
        requested: TxStatus,
    },
}

impl TxDbError {
    /// Expected conflict rather than a storage failure.
    pub fn is_already_finalized(&self) -> bool {
        matches!(self, TxDbError::AlreadyFinalized { .. })
    }
}

pub type TxDbResult<T> = Result<T, TxDbError>;

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the address index tables.
///
/// Format: `lowercase_address | id_be_bytes`
///
/// Big-endian ids keep each address's entries in insertion order.
fn make_index_key(address: &str, id: u64) -> Vec<u8> {
    let mut key = make_prefix(address);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Build a prefix key for range scanning all entries of an address.
fn make_prefix(address: &str) -> Vec<u8> {
    let addr = address.to_lowercase();
    let mut prefix = Vec::with_capacity(addr.len() + 1 + 8);
    prefix.extend_from_slice(addr.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a range scan (prefix with 0xFF bytes appended).
fn make_prefix_end(address: &str) -> Vec<u8> {
    let mut end = make_prefix(address);
    // One byte longer than any id suffix
    end.extend_from_slice(&[0xFF; 9]);
    end
}

// =============================================================================
// TxDatabase
// =============================================================================

/// Embedded ACID transaction database.
pub struct TxDatabase {
    db: Database,
}

impl TxDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> TxDbResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TRANSACTIONS)?;
            let _ = write_txn.open_table(TRANSACTIONS_BY_ID)?;
            let _ = write_txn.open_table(SENDER_INDEX)?;
            let _ = write_txn.open_table(RECEIVER_INDEX)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a transaction, or settle the status of an existing pending one.
    ///
    /// - Unknown hash: the record is inserted with a fresh id and the current
    ///   time as its timestamp.
    /// - Known hash, stored status `pending`: only `status` is updated; the
    ///   other incoming fields are ignored.
    /// - Known hash, stored status final: nothing is written and
    ///   [`TxDbError::AlreadyFinalized`] is returned.
    ///
    /// Returns the record as stored after the write.
    pub fn save_transaction(&self, tx: &StoredTransaction) -> TxDbResult<StoredTransaction> {
        let write_txn = self.db.begin_write()?;

        let outcome = {
            let mut tx_table = write_txn.open_table(TRANSACTIONS)?;
            let existing: Option<StoredTransaction> = match tx_table.get(tx.hash.as_str())? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };

            match existing {
                Some(stored) if stored.status.is_final() => Err(TxDbError::AlreadyFinalized {
                    hash: stored.hash,
                    current: stored.status,
                    requested: tx.status,
                }),
                Some(mut stored) => {
                    stored.status = tx.status;
                    let json = serde_json::to_vec(&stored)?;
                    tx_table.insert(stored.hash.as_str(), json.as_slice())?;
                    Ok(stored)
                }
                None => {
                    let mut record = tx.clone();
                    record.id = next_id(&write_txn)?;
                    record.timestamp = Utc::now();

                    let json = serde_json::to_vec(&record)?;
                    tx_table.insert(record.hash.as_str(), json.as_slice())?;
                    insert_indexes(&write_txn, &record)?;
                    Ok(record)
                }
            }
        };

        // On error the write transaction is dropped, which aborts it.
        let saved = outcome?;
        write_txn.commit()?;
        Ok(saved)
    }

    /// Look up a single transaction by hash.
    pub fn get_transaction(&self, hash: &str) -> TxDbResult<Option<StoredTransaction>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRANSACTIONS)?;
        match table.get(hash)? {
            Some(value) => {
                let tx: StoredTransaction = serde_json::from_slice(value.value())?;
                Ok(Some(tx))
            }
            None => Ok(None),
        }
    }

    /// Page of transactions in insertion order.
    ///
    /// Empty `sender`/`receiver` match everything; non-empty ones match the
    /// lower-cased address exactly. At most [`PAGE_SIZE`] records are returned,
    /// skipping the first `offset` matches.
    pub fn list_transactions(
        &self,
        sender: &str,
        receiver: &str,
        offset: usize,
    ) -> TxDbResult<Vec<StoredTransaction>> {
        let sender = sender.trim().to_lowercase();
        let receiver = receiver.trim().to_lowercase();

        let read_txn = self.db.begin_read()?;
        let tx_table = read_txn.open_table(TRANSACTIONS)?;
        let mut page = Page::new(&tx_table, &receiver, offset);

        // Walk hashes in insertion order, narrowed by the most selective
        // index, and stop as soon as the page is full.
        if !sender.is_empty() {
            // The sender index does not cover the receiver filter.
            page.check_receiver = !receiver.is_empty();
            let index = read_txn.open_table(SENDER_INDEX)?;
            let (start, end) = (make_prefix(&sender), make_prefix_end(&sender));
            for entry in index.range(start.as_slice()..end.as_slice())? {
                let (_, hash) = entry?;
                if page.offer(hash.value())? {
                    break;
                }
            }
        } else if !receiver.is_empty() {
            let index = read_txn.open_table(RECEIVER_INDEX)?;
            let (start, end) = (make_prefix(&receiver), make_prefix_end(&receiver));
            for entry in index.range(start.as_slice()..end.as_slice())? {
                let (_, hash) = entry?;
                if page.offer(hash.value())? {
                    break;
                }
            }
        } else {
            let by_id = read_txn.open_table(TRANSACTIONS_BY_ID)?;
            for entry in by_id.iter()? {
                let (_, hash) = entry?;
                if page.offer(hash.value())? {
                    break;
                }
            }
        }

        Ok(page.records)
    }
}

/// One page of a listing, filled from hashes in insertion order.
struct Page<'a> {
    tx_table: &'a ReadOnlyTable<&'static str, &'static [u8]>,
    receiver: &'a str,
    check_receiver: bool,
    to_skip: usize,
    records: Vec<StoredTransaction>,
}

impl<'a> Page<'a> {
    fn new(
        tx_table: &'a ReadOnlyTable<&'static str, &'static [u8]>,
        receiver: &'a str,
        offset: usize,
    ) -> Self {
        Self {
            tx_table,
            receiver,
            check_receiver: false,
            to_skip: offset,
            records: Vec::new(),
        }
    }

    /// Consider one candidate hash. Returns `true` once the page is full.
    fn offer(&mut self, hash: &str) -> TxDbResult<bool> {
        // Skipped matches are only loaded when the receiver must be checked.
        if self.to_skip > 0 && !self.check_receiver {
            self.to_skip -= 1;
            return Ok(false);
        }

        let Some(value) = self.tx_table.get(hash)? else {
            return Ok(false);
        };
        let tx: StoredTransaction = serde_json::from_slice(value.value())?;

        if self.check_receiver && tx.receiver != self.receiver {
            return Ok(false);
        }
        if self.to_skip > 0 {
            self.to_skip -= 1;
            return Ok(false);
        }

        self.records.push(tx);
        Ok(self.records.len() >= PAGE_SIZE)
    }
}

/// Allocate the next transaction id.
fn next_id(write_txn: &WriteTransaction) -> TxDbResult<u64> {
    let mut sequences = write_txn.open_table(SEQUENCES)?;
    let last = sequences
        .get(TRANSACTION_SEQUENCE)?
        .map(|v| v.value())
        .unwrap_or(0);
    let id = last + 1;
    sequences.insert(TRANSACTION_SEQUENCE, id)?;
    Ok(id)
}

/// Write the ordering and address index entries of a new record.
fn insert_indexes(write_txn: &WriteTransaction, tx: &StoredTransaction) -> TxDbResult<()> {
    let hash = tx.hash.as_str();

    let mut by_id = write_txn.open_table(TRANSACTIONS_BY_ID)?;
    by_id.insert(tx.id, hash)?;

    let mut senders = write_txn.open_table(SENDER_INDEX)?;
    senders.insert(make_index_key(&tx.sender, tx.id).as_slice(), hash)?;

    let mut receivers = write_txn.open_table(RECEIVER_INDEX)?;
    receivers.insert(make_index_key(&tx.receiver, tx.id).as_slice(), hash)?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
