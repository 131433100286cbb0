// Copyright (c) 2024 Botho Foundation

use super::{OutputKind, OutputRules};
use crate::{
    address::Address,
    amount::{BaseToken, Mana},
    feature::{FeatureKind, Features},
    native_token::NativeTokens,
    unlock_condition::{UnlockConditionKind, UnlockConditions},
};
use serde::{Deserialize, Serialize};

pub(crate) const RULES: OutputRules = OutputRules {
    kind: OutputKind::Basic,
    required_conditions: &[UnlockConditionKind::Address],
    allowed_conditions: &[
        UnlockConditionKind::Address,
        UnlockConditionKind::StorageDepositReturn,
        UnlockConditionKind::Timelock,
        UnlockConditionKind::Expiration,
    ],
    features: &[
        FeatureKind::Sender,
        FeatureKind::Metadata,
        FeatureKind::Tag,
        FeatureKind::NativeToken,
    ],
    immutable_features: &[],
};

/// Holds base tokens, mana and native tokens for an owner.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct BasicOutput {
    /// Base tokens held.
    pub amount: BaseToken,
    /// Stored mana.
    pub mana: Mana,
    /// Native tokens held.
    pub native_tokens: NativeTokens,
    /// Unlock conditions.
    pub unlock_conditions: UnlockConditions,
    /// Features.
    pub features: Features,
}

impl BasicOutput {
    /// The owner named by the address condition.
    pub fn address(&self) -> Option<&Address> {
        self.unlock_conditions.address()
    }

    /// Whether this output only moves base tokens to an address: a single
    /// address condition, no features and no native tokens.
    pub fn is_simple_transfer(&self) -> bool {
        self.unlock_conditions.len() == 1
            && self.unlock_conditions.address().is_some()
            && self.features.is_empty()
            && self.native_tokens.is_empty()
    }
}
