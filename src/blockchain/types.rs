// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::{B256, U256};

use super::transactions::format_amount;

/// FIL and iFIL both use 18 decimals (1 FIL = 10^18 attoFIL).
pub const FIL_DECIMALS: u8 = 18;

/// Filecoin FEVM network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// EVM chain ID
    pub chain_id: u64,
    /// Default RPC endpoint URL
    pub rpc_url: &'static str,
    /// iFIL (wrapped FIL) contract, when known for this network
    pub ifil_address: Option<&'static str>,
}

/// Filecoin mainnet configuration.
pub const FIL_MAINNET: NetworkConfig = NetworkConfig {
    name: "Filecoin Mainnet",
    chain_id: 314,
    rpc_url: "https://api.node.glif.io/rpc/v1",
    ifil_address: Some("0x690908f7fa93afC040CFbD9fE1dDd2C2668Aa0e0"),
};

/// Filecoin Calibration testnet configuration.
///
/// The iFIL deployment on Calibration moves with pool redeploys, so it has to
/// be supplied through `IFIL_TOKEN_ADDRESS`.
pub const FIL_CALIBRATION: NetworkConfig = NetworkConfig {
    name: "Filecoin Calibration Testnet",
    chain_id: 314_159,
    rpc_url: "https://api.calibration.node.glif.io/rpc/v1",
    ifil_address: None,
};

/// Resolve a network selector (`testnet`, `mainnet`) to its configuration.
pub fn network_from_selector(raw: &str) -> Option<NetworkConfig> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "testnet" => Some(FIL_CALIBRATION),
        "mainnet" => Some(FIL_MAINNET),
        _ => None,
    }
}

/// Native and wrapped balances of one address, in attoFIL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletBalance {
    pub native: U256,
    pub wrapped: U256,
}

impl WalletBalance {
    pub fn new(native: U256, wrapped: U256) -> Self {
        Self { native, wrapped }
    }

    /// Native balance in FIL, exact decimal.
    pub fn fil(&self) -> String {
        format_amount(self.native, FIL_DECIMALS)
    }

    /// Wrapped balance in iFIL, exact decimal.
    pub fn ifil(&self) -> String {
        format_amount(self.wrapped, FIL_DECIMALS)
    }
}

/// Handle of a broadcast transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxHandle {
    pub hash: B256,
}

impl TxHandle {
    pub fn new(hash: B256) -> Self {
        Self { hash }
    }

    /// Canonical 0x-prefixed lower-case hash.
    pub fn hash_hex(&self) -> String {
        alloy::hex::encode_prefixed(self.hash)
    }
}

/// Final outcome of a mined transfer, read from its receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Confirmed,
    Failed,
}
