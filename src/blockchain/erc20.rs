// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 contract interactions for the iFIL wrapped token.

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    sol,
};

use super::client::LedgerError;
use super::transactions::inflate_gas_limit;

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// ERC-20 contract wrapper.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    /// Create a new ERC-20 contract instance.
    pub fn new(provider: &P, address: Address) -> Self {
        Self {
            contract: IERC20::new(address, provider.clone()),
        }
    }

    /// Get the raw token balance of an address.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, LedgerError> {
        self.contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| LedgerError::Query(format!("failed to get token balance: {e}")))
    }

    /// Transfer tokens from `from` to `to`.
    ///
    /// The provider must carry a wallet able to sign for `from`; nonce and fee
    /// parameters are filled by the provider. Only the gas limit is set here,
    /// with the same safety margin as native transfers.
    pub async fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<B256, LedgerError> {
        let call = self.contract.transfer(to, amount).from(from);

        let estimated = call
            .estimate_gas()
            .await
            .map_err(|e| LedgerError::Estimation(format!("failed to estimate gas: {e}")))?;

        let pending = call
            .gas(inflate_gas_limit(estimated))
            .send()
            .await
            .map_err(|e| LedgerError::Broadcast(format!("failed to send tx: {e}")))?;

        Ok(*pending.tx_hash())
    }
}
