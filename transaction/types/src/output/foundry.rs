// Copyright (c) 2024 Botho Foundation

use super::{OutputKind, OutputRules};
use crate::{
    address::AccountAddress,
    amount::{BaseToken, Mana},
    error::SyntaxError,
    feature::{FeatureKind, Features},
    ids::FoundryId,
    native_token::NativeTokens,
    token_scheme::TokenScheme,
    unlock_condition::{UnlockConditionKind, UnlockConditions},
};
use serde::{Deserialize, Serialize};

pub(crate) const RULES: OutputRules = OutputRules {
    kind: OutputKind::Foundry,
    required_conditions: &[UnlockConditionKind::ImmutableAccountAddress],
    allowed_conditions: &[UnlockConditionKind::ImmutableAccountAddress],
    features: &[FeatureKind::Metadata],
    immutable_features: &[FeatureKind::Metadata],
};

/// A foundry: controls the supply of one native token on behalf of an
/// account.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct FoundryOutput {
    /// Base tokens held.
    pub amount: BaseToken,
    /// Stored mana.
    pub mana: Mana,
    /// Native tokens held.
    pub native_tokens: NativeTokens,
    /// Serial number from the anchoring account's foundry counter.
    pub serial_number: u32,
    /// Supply accounting.
    pub token_scheme: TokenScheme,
    /// The anchoring account.
    pub unlock_conditions: UnlockConditions,
    /// Mutable features.
    pub features: Features,
    /// Features fixed at genesis.
    pub immutable_features: Features,
}

impl FoundryOutput {
    /// The anchoring account's address.
    pub fn account_address(&self) -> Option<&AccountAddress> {
        self.unlock_conditions.immutable_account_address()
    }

    /// The foundry's id, which is also the id of its native token.
    pub fn foundry_id(&self) -> Option<FoundryId> {
        self.account_address().map(|address| {
            FoundryId::new(address.0, self.serial_number, self.token_scheme.kind())
        })
    }

    pub(crate) fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        self.token_scheme.syntactic_validate()?;
        Ok(())
    }
}
