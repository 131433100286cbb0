// Copyright (c) 2024 Botho Foundation

use super::ChainTransition;
use crate::validation::{
    error::{ChainTransitionError, ValidationError, ValidationResult},
    working_set::WorkingSet,
};
use nova_transaction_types::{
    ChainId, ChainTransitionType, FoundryId, FoundryOutput, Output, U256,
};

pub(super) fn foundry_stvf(
    ws: &WorkingSet,
    foundry_id: FoundryId,
    transition: ChainTransition<'_, FoundryOutput>,
) -> ValidationResult<()> {
    let zero = U256::zero();
    let in_sum = ws.in_native_tokens.get(&foundry_id).unwrap_or(&zero);
    let out_sum = ws.out_native_tokens.get(&foundry_id).unwrap_or(&zero);

    let result = match transition {
        ChainTransition::Genesis(next) => genesis_valid(ws, foundry_id, next, out_sum),
        // Serial number and token scheme kind are part of the foundry id, so
        // a successor with different ones never reaches this point.
        ChainTransition::StateChange { current, next, .. } => {
            if current.immutable_features != next.immutable_features {
                Err(ChainTransitionError::ImmutableFeaturesChanged)
            } else {
                current
                    .token_scheme
                    .state_transition(
                        ChainTransitionType::StateChange,
                        Some(&next.token_scheme),
                        in_sum,
                        out_sum,
                    )
                    .map_err(Into::into)
            }
        }
        ChainTransition::Destroy { current, .. } => current
            .token_scheme
            .state_transition(ChainTransitionType::Destroy, None, in_sum, out_sum)
            .map_err(Into::into),
    };
    result.map_err(|error| ValidationError::ChainTransition {
        chain: ChainId::Foundry(foundry_id),
        error,
    })
}

fn genesis_valid(
    ws: &WorkingSet,
    foundry_id: FoundryId,
    next: &FoundryOutput,
    out_sum: &U256,
) -> Result<(), ChainTransitionError> {
    next.token_scheme
        .state_transition(ChainTransitionType::Genesis, None, &U256::zero(), out_sum)?;

    let account_id = foundry_id.account_id;
    let account_chain = ChainId::Account(account_id);
    let counters = match (
        ws.current_state(&account_chain).map(|input| input.output),
        ws.next_state(&account_chain),
    ) {
        (Some(Output::Account(current)), Some(Output::Account(next))) => {
            (current.foundry_counter, next.foundry_counter)
        }
        _ => return Err(ChainTransitionError::MissingAnchorAccount(account_id)),
    };

    let (start, end) = counters;
    let serial = next.serial_number;
    if serial < start || serial >= end {
        return Err(ChainTransitionError::SerialOutOfRange { serial, start, end });
    }

    // Serials must increase across this account's new foundries in output
    // order, up to this one.
    let outputs = ws.outputs();
    for index in ws.new_foundries.get(&account_id).into_iter().flatten() {
        let Some(other) = outputs[*index].as_foundry() else {
            continue;
        };
        if other.foundry_id() == Some(foundry_id) {
            break;
        }
        if other.serial_number >= serial {
            return Err(ChainTransitionError::SerialNotIncreasing {
                serial,
                previous: other.serial_number,
            });
        }
    }
    Ok(())
}
