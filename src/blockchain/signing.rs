// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped transaction signing.
//!
//! Private keys arrive with each transfer request and live only inside a
//! [`ScopedSigner`] for the duration of that request. The signer refuses to
//! sign for any sender other than the address derived from its own key.

use std::fmt;

use alloy::{
    consensus::{SignableTransaction, TxEip1559, TxEnvelope},
    network::{EthereumWallet, TxSignerSync},
    primitives::Address,
    signers::local::PrivateKeySigner,
};

use super::client::LedgerError;

/// Signing capability built from a caller-supplied private key.
pub struct ScopedSigner {
    inner: PrivateKeySigner,
}

impl ScopedSigner {
    /// Parse a hex-encoded secp256k1 key (64 hex characters, `0x` optional).
    pub fn from_hex(private_key_hex: &str) -> Result<Self, InvalidKey> {
        let key_bytes = alloy::hex::decode(private_key_hex.trim()).map_err(|_| InvalidKey)?;
        let inner = PrivateKeySigner::from_slice(&key_bytes).map_err(|_| InvalidKey)?;
        Ok(Self { inner })
    }

    /// Address derived from the key.
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Sign an EIP-1559 transaction on behalf of `expected_sender`.
    pub fn sign(
        &self,
        mut tx: TxEip1559,
        expected_sender: Address,
    ) -> Result<TxEnvelope, LedgerError> {
        self.ensure_sender(expected_sender)?;
        let signature = self
            .inner
            .sign_transaction_sync(&mut tx)
            .map_err(|e| LedgerError::Signing(format!("failed to sign transaction: {e}")))?;
        Ok(tx.into_signed(signature).into())
    }

    /// Wallet for provider-driven sends (contract calls) on behalf of `expected_sender`.
    pub fn wallet_for(&self, expected_sender: Address) -> Result<EthereumWallet, LedgerError> {
        self.ensure_sender(expected_sender)?;
        Ok(EthereumWallet::from(self.inner.clone()))
    }

    fn ensure_sender(&self, expected_sender: Address) -> Result<(), LedgerError> {
        let own = self.address();
        if own != expected_sender {
            return Err(LedgerError::Signing(format!(
                "signer address mismatch: expected {expected_sender}, got {own}"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ScopedSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// The supplied key is not a valid secp256k1 private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid private key")]
pub struct InvalidKey;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::testing::{DEV_ADDRESS, DEV_KEY};
    use alloy::primitives::{TxKind, U256};

    fn transfer() -> TxEip1559 {
        TxEip1559 {
            chain_id: 314_159,
            nonce: 0,
            gas_limit: 31_500,
            max_fee_per_gas: 2_000_000_100,
            max_priority_fee_per_gas: 100,
            to: TxKind::Call(Address::repeat_byte(0x11)),
            value: U256::from(1u64),
            ..Default::default()
        }
    }

    #[test]
    fn derives_address_with_or_without_prefix() {
        let with_prefix = ScopedSigner::from_hex(DEV_KEY).unwrap();
        let without_prefix = ScopedSigner::from_hex(DEV_KEY.trim_start_matches("0x")).unwrap();
        let expected: Address = DEV_ADDRESS.parse().unwrap();
        assert_eq!(with_prefix.address(), expected);
        assert_eq!(without_prefix.address(), expected);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert_eq!(ScopedSigner::from_hex("not-hex").unwrap_err(), InvalidKey);
        assert_eq!(ScopedSigner::from_hex("0x1234").unwrap_err(), InvalidKey);
        assert_eq!(ScopedSigner::from_hex("").unwrap_err(), InvalidKey);
    }

    #[test]
    fn signs_for_own_address() {
        let signer = ScopedSigner::from_hex(DEV_KEY).unwrap();
        let envelope = signer.sign(transfer(), signer.address()).unwrap();
        assert!(matches!(envelope, TxEnvelope::Eip1559(_)));
    }

    #[test]
    fn refuses_foreign_sender() {
        let signer = ScopedSigner::from_hex(DEV_KEY).unwrap();
        let other = Address::repeat_byte(0x99);

        let err = signer.sign(transfer(), other).unwrap_err();
        assert!(matches!(err, LedgerError::Signing(_)));

        let err = signer.wallet_for(other).unwrap_err();
        assert!(matches!(err, LedgerError::Signing(_)));
    }

    #[test]
    fn debug_output_hides_key_material() {
        let signer = ScopedSigner::from_hex(DEV_KEY).unwrap();
        let rendered = format!("{signer:?}");
        assert!(!rendered.contains("ac0974bec39a17e3"));
        assert!(rendered.contains("ScopedSigner"));
    }
}
