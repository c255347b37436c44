// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process ledger double for tests.

use std::sync::Mutex;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use super::client::{LedgerClient, LedgerError};
use super::signing::ScopedSigner;
use super::types::{TransferOutcome, TxHandle, WalletBalance};

// Well-known development key (hardhat/anvil account #0).
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Transfer as seen by the fake ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub sender: Address,
    pub receiver: Address,
    pub amount: U256,
    pub wrapped: bool,
}

/// Scripted ledger that records every call.
pub struct FakeLedger {
    pub balance: WalletBalance,
    pub hash: B256,
    pub outcome: Option<TransferOutcome>,
    pub fail_with: Option<fn() -> LedgerError>,
    calls: Mutex<Vec<&'static str>>,
    transfers: Mutex<Vec<RecordedTransfer>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            balance: WalletBalance::new(U256::ZERO, U256::ZERO),
            hash: B256::repeat_byte(0xab),
            outcome: None,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
            transfers: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(fail_with: fn() -> LedgerError) -> Self {
        Self {
            fail_with: Some(fail_with),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn transfers(&self) -> Vec<RecordedTransfer> {
        self.transfers.lock().unwrap().clone()
    }

    fn enter(&self, call: &'static str) -> Result<(), LedgerError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }

    fn record(&self, signer: &ScopedSigner, receiver: Address, amount: U256, wrapped: bool) {
        self.transfers.lock().unwrap().push(RecordedTransfer {
            sender: signer.address(),
            receiver,
            amount,
            wrapped,
        });
    }
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn get_balances(&self, _address: Address) -> Result<WalletBalance, LedgerError> {
        self.enter("get_balances")?;
        Ok(self.balance)
    }

    async fn submit_native_transfer(
        &self,
        signer: &ScopedSigner,
        receiver: Address,
        amount: U256,
    ) -> Result<TxHandle, LedgerError> {
        self.enter("submit_native_transfer")?;
        self.record(signer, receiver, amount, false);
        Ok(TxHandle::new(self.hash))
    }

    async fn submit_wrapped_transfer(
        &self,
        signer: &ScopedSigner,
        receiver: Address,
        amount: U256,
    ) -> Result<TxHandle, LedgerError> {
        self.enter("submit_wrapped_transfer")?;
        self.record(signer, receiver, amount, true);
        Ok(TxHandle::new(self.hash))
    }

    async fn transfer_outcome(&self, _hash: B256) -> Result<Option<TransferOutcome>, LedgerError> {
        self.enter("transfer_outcome")?;
        Ok(self.outcome)
    }
}
