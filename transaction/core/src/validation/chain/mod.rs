// Copyright (c) 2024 Botho Foundation

//! Chain output transitions: classify every account, foundry and NFT the
//! transaction touches and run the state transition function of its kind.

mod account;
mod foundry;
mod nft;

use super::{
    error::{ChainTransitionError, ValidationResult},
    unlock::is_unlocked,
    working_set::{ResolvedInput, WorkingSet},
};
use nova_transaction_types::{
    ChainId, ChainTransitionType, Features, Output, OutputId, SlotIndex, SyntaxError,
};
use tracing::debug;

/// One chain output moving between states.
pub(crate) enum ChainTransition<'a, T> {
    /// Created by this transaction.
    Genesis(&'a T),
    /// Consumed and created again.
    StateChange {
        current: &'a T,
        created: SlotIndex,
        next: &'a T,
    },
    /// Consumed without a successor.
    Destroy { current: &'a T, created: SlotIndex },
}

impl<'a, T> ChainTransition<'a, T> {
    fn classify(current: Option<(&'a T, SlotIndex)>, next: Option<&'a T>) -> Option<Self> {
        match (current, next) {
            (Some((current, created)), Some(next)) => Some(Self::StateChange {
                current,
                created,
                next,
            }),
            (Some((current, created)), None) => Some(Self::Destroy { current, created }),
            (None, Some(next)) => Some(Self::Genesis(next)),
            (None, None) => None,
        }
    }

    fn kind(&self) -> ChainTransitionType {
        match self {
            Self::Genesis(_) => ChainTransitionType::Genesis,
            Self::StateChange { .. } => ChainTransitionType::StateChange,
            Self::Destroy { .. } => ChainTransitionType::Destroy,
        }
    }
}

/// Run the state transition function of every chain the transaction
/// consumes or creates: consumed chains in input order, then new chains in
/// output order.
pub fn validate_chain_transitions(ws: &WorkingSet) -> ValidationResult<()> {
    for input in &ws.inputs {
        if let Some(chain_id) = input.output.resolved_chain_id(&input.output_id) {
            dispatch(ws, chain_id, Some(input), ws.next_state(&chain_id))?;
        }
    }
    for (index, output) in ws.outputs().iter().enumerate() {
        let position = u16::try_from(index)
            .map_err(|_| SyntaxError::TooManyOutputs(ws.outputs().len()))?;
        let Some(chain_id) = output.resolved_chain_id(&OutputId::new(ws.tx_id, position)) else {
            continue;
        };
        if !ws.in_chains.contains_key(&chain_id) {
            dispatch(ws, chain_id, None, Some(output))?;
        }
    }
    Ok(())
}

fn dispatch(
    ws: &WorkingSet,
    chain_id: ChainId,
    input: Option<&ResolvedInput>,
    next: Option<&Output>,
) -> ValidationResult<()> {
    match chain_id {
        ChainId::Account(account_id) => {
            let current = input.and_then(|input| {
                input
                    .output
                    .as_account()
                    .map(|output| (output, input.creation_slot))
            });
            let next = next.and_then(Output::as_account);
            match ChainTransition::classify(current, next) {
                Some(transition) => {
                    debug!(
                        chain = %chain_id,
                        transition = %transition.kind(),
                        "account transition"
                    );
                    account::account_stvf(ws, account_id, transition)
                }
                None => Ok(()),
            }
        }
        ChainId::Foundry(foundry_id) => {
            let current = input.and_then(|input| {
                input
                    .output
                    .as_foundry()
                    .map(|output| (output, input.creation_slot))
            });
            let next = next.and_then(Output::as_foundry);
            match ChainTransition::classify(current, next) {
                Some(transition) => {
                    debug!(
                        chain = %chain_id,
                        transition = %transition.kind(),
                        "foundry transition"
                    );
                    foundry::foundry_stvf(ws, foundry_id, transition)
                }
                None => Ok(()),
            }
        }
        ChainId::Nft(nft_id) => {
            let current = input.and_then(|input| {
                input
                    .output
                    .as_nft()
                    .map(|output| (output, input.creation_slot))
            });
            let next = next.and_then(Output::as_nft);
            match ChainTransition::classify(current, next) {
                Some(transition) => {
                    debug!(chain = %chain_id, transition = %transition.kind(), "NFT transition");
                    nft::nft_stvf(ws, nft_id, transition)
                }
                None => Ok(()),
            }
        }
    }
}

/// An issuer feature must name an address the transaction unlocked.
fn issuer_unlocked(
    ws: &WorkingSet,
    immutable_features: &Features,
) -> Result<(), ChainTransitionError> {
    match immutable_features.issuer() {
        Some(issuer) if !is_unlocked(ws, &issuer.address) => {
            Err(ChainTransitionError::IssuerNotUnlocked(issuer.address))
        }
        _ => Ok(()),
    }
}
