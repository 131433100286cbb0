// Copyright (c) 2024 Botho Foundation

//! Ed25519 signatures over transaction signing messages, and the signing
//! capability the builder relies on.

use displaydoc::Display;
use ed25519_dalek::{Signature, VerifyingKey};
use nova_transaction_types::{Address, Ed25519Address};
use serde::{Deserialize, Serialize};

/// An Ed25519 signature together with the public key it verifies under.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ed25519Signature {
    /// Signer's public key.
    pub public_key: VerifyingKey,
    /// Signature over the transaction signing message.
    pub signature: Signature,
}

/// A signature failed to authorize an address.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum SignatureError {
    /// Public key does not belong to address {0:?}
    AddressMismatch(Ed25519Address),

    /// Signature does not verify against the signing message
    InvalidSignature,
}

impl std::error::Error for SignatureError {}

impl Ed25519Signature {
    /// Pair a signature with its public key.
    pub fn new(public_key: VerifyingKey, signature: Signature) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// The Ed25519 address of the public key.
    pub fn address(&self) -> Ed25519Address {
        Ed25519Address::from_public_key_bytes(self.public_key.as_bytes())
    }

    /// Check the public key hashes to `address` and the signature verifies
    /// against `message`.
    pub fn verify(&self, message: &[u8], address: &Ed25519Address) -> Result<(), SignatureError> {
        if self.address() != *address {
            return Err(SignatureError::AddressMismatch(*address));
        }
        self.public_key
            .verify_strict(message, &self.signature)
            .map_err(|_| SignatureError::InvalidSignature)
    }
}

/// Errors from an [AddressSigner].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum SignerError {
    /// No signing key is known for {0}
    MissingKey(Address),

    /// {0} is a chain address and cannot sign
    NotSignable(Address),
}

impl std::error::Error for SignerError {}

/// Signs messages on behalf of Ed25519 addresses.
pub trait AddressSigner {
    /// Sign `message` with the key behind `address`.
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Ed25519Signature, SignerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    #[test]
    fn test_verify() {
        let key = signing_key();
        let signature = Ed25519Signature::new(key.verifying_key(), key.sign(b"message"));
        let address = signature.address();
        assert_eq!(signature.verify(b"message", &address), Ok(()));
        assert_eq!(
            signature.verify(b"other message", &address),
            Err(SignatureError::InvalidSignature)
        );
        let stranger = Ed25519Address([1u8; 32]);
        assert_eq!(
            signature.verify(b"message", &stranger),
            Err(SignatureError::AddressMismatch(stranger))
        );
    }
}
