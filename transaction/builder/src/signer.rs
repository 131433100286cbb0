// Copyright (c) 2024 Botho Foundation

use ed25519_dalek::{Signer, SigningKey};
use nova_transaction_core::{AddressSigner, Ed25519Signature, SignerError};
use nova_transaction_types::{Address, Ed25519Address};
use std::collections::BTreeMap;

/// Signs with Ed25519 keys held in memory, looked up by their address.
#[derive(Clone, Default)]
pub struct InMemoryAddressSigner {
    keys: BTreeMap<Address, SigningKey>,
}

impl InMemoryAddressSigner {
    /// A signer without keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signer holding `keys`.
    pub fn with_keys(keys: impl IntoIterator<Item = SigningKey>) -> Self {
        let mut signer = Self::new();
        for key in keys {
            signer.add_key(key);
        }
        signer
    }

    /// Add `key`, returning the address it signs for.
    pub fn add_key(&mut self, key: SigningKey) -> Address {
        let address = Address::Ed25519(Ed25519Address::from_public_key_bytes(
            key.verifying_key().as_bytes(),
        ));
        self.keys.insert(address, key);
        address
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are held.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl AddressSigner for InMemoryAddressSigner {
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Ed25519Signature, SignerError> {
        if address.is_chain() {
            return Err(SignerError::NotSignable(*address));
        }
        let key = self
            .keys
            .get(address)
            .ok_or(SignerError::MissingKey(*address))?;
        Ok(Ed25519Signature::new(key.verifying_key(), key.sign(message)))
    }
}
