// Copyright (c) 2024 Botho Foundation

use crate::signature::Ed25519Signature;
use nova_transaction_types::{constants::MAX_INPUTS, SyntaxError};
use serde::{Deserialize, Serialize};

/// Proof that an input may be consumed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Unlock {
    /// A signature by the key behind an Ed25519 address.
    Signature(Ed25519Signature),
    /// Reuse the signature unlock at this index.
    Reference(u16),
    /// The account consumed at this index owns the input.
    Account(u16),
    /// The NFT consumed at this index owns the input.
    Nft(u16),
}

impl Unlock {
    /// The index a referential unlock points at.
    pub fn reference(&self) -> Option<u16> {
        match self {
            Unlock::Signature(_) => None,
            Unlock::Reference(index) | Unlock::Account(index) | Unlock::Nft(index) => Some(*index),
        }
    }
}

/// One unlock per input, in input order.
///
/// Referential unlocks point strictly backwards, a reference unlock always
/// points at a signature unlock, and no signature repeats.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Unlock>", into = "Vec<Unlock>")]
pub struct Unlocks(Vec<Unlock>);

impl Unlocks {
    /// Check the unlock list's structure.
    pub fn from_vec(unlocks: Vec<Unlock>) -> Result<Self, SyntaxError> {
        if unlocks.len() > MAX_INPUTS {
            return Err(SyntaxError::TooManyInputs(unlocks.len()));
        }
        for (index, unlock) in unlocks.iter().enumerate() {
            match unlock {
                Unlock::Signature(signature) => {
                    let repeated = unlocks[..index].iter().any(
                        |earlier| matches!(earlier, Unlock::Signature(other) if other == signature),
                    );
                    if repeated {
                        return Err(SyntaxError::DuplicateSignatureUnlock(index));
                    }
                }
                Unlock::Reference(reference) => {
                    let target = usize::from(*reference);
                    if target >= index || !matches!(unlocks[target], Unlock::Signature(_)) {
                        return Err(SyntaxError::InvalidUnlockReference {
                            index,
                            reference: *reference,
                        });
                    }
                }
                Unlock::Account(reference) | Unlock::Nft(reference) => {
                    if usize::from(*reference) >= index {
                        return Err(SyntaxError::InvalidUnlockReference {
                            index,
                            reference: *reference,
                        });
                    }
                }
            }
        }
        Ok(Self(unlocks))
    }

    /// The unlock at `index`.
    pub fn get(&self, index: usize) -> Option<&Unlock> {
        self.0.get(index)
    }

    /// Iterate in input order.
    pub fn iter(&self) -> core::slice::Iter<'_, Unlock> {
        self.0.iter()
    }

    /// Number of unlocks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of signature unlocks.
    pub fn signature_count(&self) -> usize {
        self.0
            .iter()
            .filter(|unlock| matches!(unlock, Unlock::Signature(_)))
            .count()
    }
}

impl TryFrom<Vec<Unlock>> for Unlocks {
    type Error = SyntaxError;

    fn try_from(unlocks: Vec<Unlock>) -> Result<Self, Self::Error> {
        Self::from_vec(unlocks)
    }
}

impl From<Unlocks> for Vec<Unlock> {
    fn from(unlocks: Unlocks) -> Self {
        unlocks.0
    }
}
