// Copyright (c) 2024 Botho Foundation

use super::{OutputKind, OutputRules};
use crate::{
    amount::{BaseToken, EpochIndex, Mana},
    error::SyntaxError,
    ids::{AccountId, DelegationId},
    unlock_condition::{UnlockConditionKind, UnlockConditions},
};
use serde::{Deserialize, Serialize};

pub(crate) const RULES: OutputRules = OutputRules {
    kind: OutputKind::Delegation,
    required_conditions: &[UnlockConditionKind::Address],
    allowed_conditions: &[UnlockConditionKind::Address],
    features: &[],
    immutable_features: &[],
};

/// Delegates base tokens to a validator account. Owned by its address
/// condition like a basic output.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct DelegationOutput {
    /// Base tokens held.
    pub amount: BaseToken,
    /// Stored mana.
    pub mana: Mana,
    /// Amount delegated to the validator.
    pub delegated_amount: BaseToken,
    /// Id of the delegation; empty when created.
    pub delegation_id: DelegationId,
    /// The validator's account.
    pub validator_id: AccountId,
    /// First epoch of the delegation.
    pub start_epoch: EpochIndex,
    /// Last epoch of the delegation, zero while open-ended.
    pub end_epoch: EpochIndex,
    /// Unlock conditions.
    pub unlock_conditions: UnlockConditions,
}

impl DelegationOutput {
    pub(crate) fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        if self.delegated_amount > self.amount {
            return Err(SyntaxError::DelegatedAmountExceedsAmount {
                amount: self.amount,
                delegated: self.delegated_amount,
            });
        }
        Ok(())
    }
}
