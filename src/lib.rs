// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! FIL Wallet Gateway - Filecoin FEVM balance and transfer service
//!
//! This crate exposes an HTTP API for reading FIL/iFIL balances, submitting
//! FIL transfers signed with a caller-supplied key, and listing the transfers
//! it has recorded.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Filecoin FEVM integration (alloy)
//! - `storage` - Transaction database (redb)
//! - `submission` - Transfer submission flow

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod submission;
