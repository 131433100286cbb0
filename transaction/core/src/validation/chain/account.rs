// Copyright (c) 2024 Botho Foundation

use super::{issuer_unlocked, ChainTransition};
use crate::validation::{
    error::{BlockIssuerError, ChainTransitionError, ValidationError, ValidationResult},
    working_set::WorkingSet,
};
use nova_transaction_types::{
    amount::safe_add, feature::feature_unchanged, AccountId, AccountOutput, ChainId, FeatureKind,
    OutputKind, SlotIndex,
};
use tracing::warn;

pub(super) fn account_stvf(
    ws: &WorkingSet,
    account_id: AccountId,
    transition: ChainTransition<'_, AccountOutput>,
) -> ValidationResult<()> {
    let chain_error = move |error| ValidationError::ChainTransition {
        chain: ChainId::Account(account_id),
        error,
    };
    match transition {
        ChainTransition::Genesis(next) => genesis_valid(ws, account_id, next),
        ChainTransition::StateChange {
            current,
            created,
            next,
        } => {
            if current.immutable_features != next.immutable_features {
                return Err(chain_error(ChainTransitionError::ImmutableFeaturesChanged));
            }
            if current.state_index == next.state_index {
                governance_valid(current, next).map_err(chain_error)?;
            } else {
                state_valid(ws, account_id, current, next).map_err(chain_error)?;
            }
            block_issuer_valid(ws, account_id, current, created, next)
        }
        ChainTransition::Destroy { current, .. } => destruction_valid(ws, account_id, current),
    }
}

fn genesis_valid(
    ws: &WorkingSet,
    account_id: AccountId,
    next: &AccountOutput,
) -> ValidationResult<()> {
    let chain_error = move |error| ValidationError::ChainTransition {
        chain: ChainId::Account(account_id),
        error,
    };
    if !next.account_id.is_empty() {
        return Err(chain_error(ChainTransitionError::NonEmptyGenesisId));
    }
    if let Some(feature) = next.features.block_issuer() {
        let min_slot = min_expiry_slot(ws)?;
        if feature.expiry_slot != 0 && feature.expiry_slot < min_slot {
            return Err(ValidationError::BlockIssuer {
                account: account_id,
                error: BlockIssuerError::ExpiryTooSoon {
                    expiry: feature.expiry_slot,
                    min_slot,
                },
            });
        }
    }
    issuer_unlocked(ws, &next.immutable_features).map_err(chain_error)
}

/// Same state index: only the controllers and mutable features may change.
fn governance_valid(
    current: &AccountOutput,
    next: &AccountOutput,
) -> Result<(), ChainTransitionError> {
    let changed = if current.amount != next.amount {
        Some("amount")
    } else if current.native_tokens != next.native_tokens {
        Some("native tokens")
    } else if current.state_metadata != next.state_metadata {
        Some("state metadata")
    } else if current.foundry_counter != next.foundry_counter {
        Some("foundry counter")
    } else {
        None
    };
    match changed {
        Some(field) => Err(ChainTransitionError::GovernanceFieldChanged(field)),
        None => Ok(()),
    }
}

/// State index bumped by one: controllers are frozen and the foundry
/// counter grows by the number of foundries created for this account.
fn state_valid(
    ws: &WorkingSet,
    account_id: AccountId,
    current: &AccountOutput,
    next: &AccountOutput,
) -> Result<(), ChainTransitionError> {
    if current.state_controller_address() != next.state_controller_address() {
        return Err(ChainTransitionError::StateTransitionFieldChanged("state controller"));
    }
    if current.governor_address() != next.governor_address() {
        return Err(ChainTransitionError::StateTransitionFieldChanged("governor"));
    }
    if next.foundry_counter < current.foundry_counter {
        return Err(ChainTransitionError::FoundryCounterDecreased {
            current: current.foundry_counter,
            next: next.foundry_counter,
        });
    }
    if current.state_index.checked_add(1) != Some(next.state_index) {
        return Err(ChainTransitionError::InvalidStateIndex {
            current: current.state_index,
            next: next.state_index,
        });
    }
    if !feature_unchanged(FeatureKind::Metadata, &current.features, &next.features) {
        return Err(ChainTransitionError::MetadataFeatureChanged);
    }

    let expected = next.foundry_counter - current.foundry_counter;
    let created = ws.new_foundries.get(&account_id).map_or(0, Vec::len);
    let created = u32::try_from(created).unwrap_or(u32::MAX);
    if expected != created {
        return Err(ChainTransitionError::FoundryCountMismatch { expected, created });
    }
    Ok(())
}

fn min_expiry_slot(ws: &WorkingSet) -> ValidationResult<SlotIndex> {
    Ok(safe_add(
        ws.creation_slot(),
        ws.params.liveness_threshold,
        "block issuer expiry",
    )?)
}

fn credit_valid(ws: &WorkingSet, account_id: &AccountId) -> Result<(), BlockIssuerError> {
    match ws.block_issuance_credits.get(account_id) {
        None => Err(BlockIssuerError::MissingCredit),
        Some(credit) if *credit < 0 => Err(BlockIssuerError::NegativeCredit(*credit)),
        Some(_) => Ok(()),
    }
}

/// Credit, expiry and mana rules of accounts carrying a block issuer feature
/// on either side of a state change.
fn block_issuer_valid(
    ws: &WorkingSet,
    account_id: AccountId,
    current: &AccountOutput,
    created: SlotIndex,
    next: &AccountOutput,
) -> ValidationResult<()> {
    let block_issuer_error = move |error| ValidationError::BlockIssuer {
        account: account_id,
        error,
    };
    let current_feature = current.features.block_issuer();
    let next_feature = next.features.block_issuer();
    if current_feature.is_none() && next_feature.is_none() {
        return Ok(());
    }
    credit_valid(ws, &account_id).map_err(block_issuer_error)?;

    let slot = ws.creation_slot();
    let min_slot = min_expiry_slot(ws)?;
    let expiry_too_soon = |expiry: SlotIndex| expiry != 0 && expiry < min_slot;
    match (current_feature, next_feature) {
        (Some(current_feature), None) if !current_feature.is_expired(slot) => {
            return Err(block_issuer_error(BlockIssuerError::RemovedBeforeExpiry));
        }
        (Some(current_feature), Some(next_feature)) if !current_feature.is_expired(slot) => {
            if next_feature.expiry_slot != current_feature.expiry_slot
                && expiry_too_soon(next_feature.expiry_slot)
            {
                return Err(block_issuer_error(BlockIssuerError::ExpiryTooSoon {
                    expiry: next_feature.expiry_slot,
                    min_slot,
                }));
            }
        }
        (_, Some(next_feature)) if expiry_too_soon(next_feature.expiry_slot) => {
            return Err(block_issuer_error(BlockIssuerError::ExpiryTooSoon {
                expiry: next_feature.expiry_slot,
                min_slot,
            }));
        }
        _ => {}
    }

    // An expired feature being dropped releases the account's mana.
    if next_feature.is_none() {
        return Ok(());
    }

    let decay = &ws.mana_decay;
    let account_mana = safe_add(
        decay.stored_mana_with_decay(current.mana, created, slot)?,
        decay.potential_mana_with_decay(current.amount, created, slot)?,
        "account mana",
    )?;
    let mut retained = safe_add(
        next.mana,
        ws.tx.essence.allotments.get(&account_id),
        "retained mana",
    )?;
    let locked_outputs = ws
        .outputs_of_kind(OutputKind::Basic)
        .chain(ws.outputs_of_kind(OutputKind::Nft))
        .filter(|output| output.unlock_conditions().is_mana_locked_to(&account_id, min_slot));
    for output in locked_outputs {
        retained = safe_add(retained, output.mana(), "retained mana")?;
    }
    if account_mana > retained {
        warn!(
            account = %account_id,
            expected = account_mana,
            got = retained,
            "mana moved off block issuer account"
        );
        return Err(block_issuer_error(BlockIssuerError::ManaMovedOffAccount {
            account_mana,
            retained,
        }));
    }
    Ok(())
}

/// A block issuer account may only be destroyed once its feature expired.
fn destruction_valid(
    ws: &WorkingSet,
    account_id: AccountId,
    current: &AccountOutput,
) -> ValidationResult<()> {
    let Some(feature) = current.features.block_issuer() else {
        return Ok(());
    };
    let block_issuer_error = move |error| ValidationError::BlockIssuer {
        account: account_id,
        error,
    };
    if !feature.is_expired(ws.creation_slot()) {
        return Err(block_issuer_error(BlockIssuerError::DestroyedBeforeExpiry(
            feature.expiry_slot,
        )));
    }
    credit_valid(ws, &account_id).map_err(block_issuer_error)
}
