// Copyright (c) 2024 Botho Foundation

//! Input unlock authorization.

use super::{
    error::{ValidationError, ValidationResult},
    working_set::{UnlockedAddress, WorkingSet},
};
use crate::unlock::Unlock;
use nova_transaction_types::{Address, Output, SyntaxError};
use tracing::warn;

fn unlock_name(unlock: &Unlock) -> &'static str {
    match unlock {
        Unlock::Signature(_) => "signature",
        Unlock::Reference(_) => "reference",
        Unlock::Account(_) => "account",
        Unlock::Nft(_) => "NFT",
    }
}

/// Check that every input is unlocked by its owner, recording each address
/// proven unlocked in the working set.
///
/// An Ed25519 owner signs once; later inputs of the same owner reference
/// that signature. A chain address owner is unlocked only when its chain
/// output was consumed by an earlier input, which the unlock references.
pub fn validate_input_unlocks(ws: &mut WorkingSet) -> ValidationResult<()> {
    for index in 0..ws.inputs.len() {
        let owner = ws.input_owner(index)?;
        let tx = ws.tx;
        let unlock = tx.unlocks.get(index).ok_or(SyntaxError::UnlockCountMismatch {
            inputs: ws.inputs.len(),
            unlocks: tx.unlocks.len(),
        })?;
        unlock_input(ws, index, &owner, unlock)?;

        // A consumed account or NFT unlocks its own address for later inputs.
        let input = ws.inputs[index];
        let chain_address = match input.output {
            Output::Account(_) | Output::Nft(_) => input
                .output
                .resolved_chain_id(&input.output_id)
                .and_then(|chain_id| chain_id.to_address()),
            _ => None,
        };
        if let Some(address) = chain_address {
            ws.unlocked.insert(
                address,
                UnlockedAddress {
                    index,
                    by_signature: false,
                },
            );
        }
    }
    Ok(())
}

fn unlock_input(
    ws: &mut WorkingSet,
    index: usize,
    owner: &Address,
    unlock: &Unlock,
) -> ValidationResult<()> {
    let wrong_kind = || ValidationError::WrongUnlockKind {
        index,
        address: *owner,
        unlock: unlock_name(unlock),
    };
    match (owner, unlock) {
        (Address::Ed25519(address), Unlock::Signature(signature)) => {
            if let Some(first) = ws.unlocked.get(owner) {
                return Err(ValidationError::SignatureReused {
                    index,
                    address: *owner,
                    first: first.index,
                });
            }
            signature
                .verify(&ws.signing_message, address)
                .map_err(|error| {
                    warn!(index, address = %owner, error = %error, "signature rejected");
                    ValidationError::InvalidSignature { index, error }
                })?;
            ws.unlocked.insert(
                *owner,
                UnlockedAddress {
                    index,
                    by_signature: true,
                },
            );
            Ok(())
        }
        (Address::Ed25519(_), Unlock::Reference(reference)) => {
            match ws.unlocked.get(owner) {
                Some(unlocked)
                    if unlocked.by_signature && unlocked.index == usize::from(*reference) =>
                {
                    Ok(())
                }
                _ => Err(ValidationError::InvalidUnlockReference {
                    index,
                    reference: *reference,
                    address: *owner,
                }),
            }
        }
        (Address::Account(_), Unlock::Account(reference))
        | (Address::Nft(_), Unlock::Nft(reference)) => match ws.unlocked.get(owner) {
            None => Err(ValidationError::ChainAddressNotUnlocked {
                index,
                address: *owner,
            }),
            Some(unlocked) if unlocked.index == usize::from(*reference) => Ok(()),
            Some(_) => Err(ValidationError::InvalidUnlockReference {
                index,
                reference: *reference,
                address: *owner,
            }),
        },
        _ => Err(wrong_kind()),
    }
}

/// Whether `address` was proven unlocked by the unlock check.
pub(crate) fn is_unlocked(ws: &WorkingSet, address: &Address) -> bool {
    ws.unlocked.contains_key(address)
}
