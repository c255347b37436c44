// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filecoin FEVM client for balance queries and transfer submission.

use std::{future::Future, time::Duration};

use alloy::{
    eips::eip2718::Encodable2718,
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder},
};
use async_trait::async_trait;
use url::Url;

use super::erc20::Erc20Contract;
use super::signing::ScopedSigner;
use super::transactions::{
    build_native_transfer, inflate_gas_limit, native_transfer_request, FeeParams,
};
use super::types::*;

/// Remote ledger operations used by the HTTP layer and the submission flow.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Native and wrapped balances of `address`.
    async fn get_balances(&self, address: Address) -> Result<WalletBalance, LedgerError>;

    /// Price, sign and broadcast a plain FIL transfer.
    async fn submit_native_transfer(
        &self,
        signer: &ScopedSigner,
        receiver: Address,
        amount: U256,
    ) -> Result<TxHandle, LedgerError>;

    /// Sign and broadcast an iFIL `transfer` call.
    async fn submit_wrapped_transfer(
        &self,
        signer: &ScopedSigner,
        receiver: Address,
        amount: U256,
    ) -> Result<TxHandle, LedgerError>;

    /// Receipt outcome of a broadcast transfer, `None` while unmined.
    async fn transfer_outcome(&self, hash: B256) -> Result<Option<TransferOutcome>, LedgerError>;
}

/// Client bound to one configured network.
///
/// A provider is built per call; nonce and fee data are never cached.
pub struct FilecoinClient {
    network: NetworkConfig,
    rpc_url: Url,
    ifil_address: Address,
}

impl FilecoinClient {
    pub fn new(network: NetworkConfig, rpc_url: Url, ifil_address: Address) -> Self {
        Self {
            network,
            rpc_url,
            ifil_address,
        }
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Build a provider and resolve the chain id, checking it against the
    /// configured network.
    async fn connect(&self) -> Result<(impl Provider + Clone, u64), LedgerError> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        if chain_id != self.network.chain_id {
            return Err(LedgerError::Connection(format!(
                "endpoint serves chain {chain_id}, expected {} ({})",
                self.network.chain_id, self.network.name
            )));
        }

        Ok((provider, chain_id))
    }
}

#[async_trait]
impl LedgerClient for FilecoinClient {
    async fn get_balances(&self, address: Address) -> Result<WalletBalance, LedgerError> {
        let (provider, _) = self.connect().await?;

        let native = provider.get_balance(address).await.map_err(|e| {
            tracing::error!(address = %address, error = %e, "Failed to get FIL balance");
            LedgerError::Query(format!("failed to get FIL balance: {e}"))
        })?;

        let wrapped = Erc20Contract::new(&provider, self.ifil_address)
            .balance_of(address)
            .await
            .inspect_err(|e| {
                tracing::error!(address = %address, error = %e, "Failed to get iFIL balance");
            })?;

        Ok(WalletBalance::new(native, wrapped))
    }

    async fn submit_native_transfer(
        &self,
        signer: &ScopedSigner,
        receiver: Address,
        amount: U256,
    ) -> Result<TxHandle, LedgerError> {
        let (provider, chain_id) = self.connect().await?;
        let sender = signer.address();

        let nonce = provider
            .get_transaction_count(sender)
            .pending()
            .await
            .map_err(|e| LedgerError::Estimation(format!("failed to get nonce: {e}")))?;

        let tip = provider
            .get_max_priority_fee_per_gas()
            .await
            .map_err(|e| LedgerError::Estimation(format!("failed to get gas tip cap: {e}")))?;
        let fees = FeeParams::from_tip(tip);

        let estimated = provider
            .estimate_gas(native_transfer_request(sender, receiver, amount))
            .await
            .map_err(|e| LedgerError::Estimation(format!("failed to estimate gas: {e}")))?;

        let tx = build_native_transfer(
            chain_id,
            nonce,
            fees,
            inflate_gas_limit(estimated),
            receiver,
            amount,
        );
        let envelope = signer.sign(tx, sender)?;

        let pending = provider
            .send_raw_transaction(&envelope.encoded_2718())
            .await
            .map_err(|e| {
                tracing::error!(
                    sender = %sender,
                    receiver = %receiver,
                    amount = %amount,
                    error = %e,
                    "Failed to broadcast FIL transfer"
                );
                LedgerError::Broadcast(format!("failed to send tx: {e}"))
            })?;

        Ok(TxHandle::new(*pending.tx_hash()))
    }

    async fn submit_wrapped_transfer(
        &self,
        signer: &ScopedSigner,
        receiver: Address,
        amount: U256,
    ) -> Result<TxHandle, LedgerError> {
        // Confirms the endpoint before any key material is handed to a provider.
        let _ = self.connect().await?;
        let sender = signer.address();
        let wallet = signer.wallet_for(sender)?;

        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());

        let hash = Erc20Contract::new(&provider, self.ifil_address)
            .transfer(sender, receiver, amount)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    sender = %sender,
                    receiver = %receiver,
                    amount = %amount,
                    error = %e,
                    "Failed to submit iFIL transfer"
                );
            })?;

        Ok(TxHandle::new(hash))
    }

    async fn transfer_outcome(&self, hash: B256) -> Result<Option<TransferOutcome>, LedgerError> {
        let (provider, _) = self.connect().await?;

        let receipt = provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| LedgerError::Query(format!("failed to get receipt: {e}")))?;

        Ok(receipt.map(|r| {
            if r.status() {
                TransferOutcome::Confirmed
            } else {
                TransferOutcome::Failed
            }
        }))
    }
}

/// Bound a ledger call by `deadline`.
///
/// Expiry only stops waiting: a transfer that reached the network may still
/// be mined.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, LedgerError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| LedgerError::DeadlineExceeded(deadline))?
}

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger connection failed: {0}")]
    Connection(String),

    #[error("ledger query failed: {0}")]
    Query(String),

    #[error("fee estimation failed: {0}")]
    Estimation(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("broadcast failed: {0}")]
    Broadcast(String),

    #[error("ledger call exceeded {0:?}; a submitted transfer may still have been broadcast")]
    DeadlineExceeded(Duration),
}
