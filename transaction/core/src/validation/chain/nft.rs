// Copyright (c) 2024 Botho Foundation

use super::{issuer_unlocked, ChainTransition};
use crate::validation::{
    error::{ChainTransitionError, ValidationError, ValidationResult},
    working_set::WorkingSet,
};
use nova_transaction_types::{ChainId, NftId, NftOutput};

pub(super) fn nft_stvf(
    ws: &WorkingSet,
    nft_id: NftId,
    transition: ChainTransition<'_, NftOutput>,
) -> ValidationResult<()> {
    let result = match transition {
        ChainTransition::Genesis(next) => {
            if next.nft_id.is_empty() {
                issuer_unlocked(ws, &next.immutable_features)
            } else {
                Err(ChainTransitionError::NonEmptyGenesisId)
            }
        }
        ChainTransition::StateChange { current, next, .. } => {
            if current.immutable_features == next.immutable_features {
                Ok(())
            } else {
                Err(ChainTransitionError::ImmutableFeaturesChanged)
            }
        }
        ChainTransition::Destroy { .. } => Ok(()),
    };
    result.map_err(|error| ValidationError::ChainTransition {
        chain: ChainId::Nft(nft_id),
        error,
    })
}
