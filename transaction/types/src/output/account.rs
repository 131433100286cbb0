// Copyright (c) 2024 Botho Foundation

use super::{OutputKind, OutputRules};
use crate::{
    address::Address,
    amount::{BaseToken, Mana},
    chain::ChainId,
    error::SyntaxError,
    feature::{FeatureKind, Features},
    ids::AccountId,
    native_token::NativeTokens,
    unlock_condition::{UnlockConditionKind, UnlockConditions},
};
use serde::{Deserialize, Serialize};

pub(crate) const RULES: OutputRules = OutputRules {
    kind: OutputKind::Account,
    required_conditions: &[
        UnlockConditionKind::StateControllerAddress,
        UnlockConditionKind::GovernorAddress,
    ],
    allowed_conditions: &[
        UnlockConditionKind::StateControllerAddress,
        UnlockConditionKind::GovernorAddress,
    ],
    features: &[
        FeatureKind::Sender,
        FeatureKind::Metadata,
        FeatureKind::BlockIssuer,
        FeatureKind::Staking,
    ],
    immutable_features: &[FeatureKind::Issuer, FeatureKind::Metadata],
};

/// An account: a chain output controlled by a state controller and a
/// governor, anchoring foundries and optionally issuing blocks.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct AccountOutput {
    /// Base tokens held.
    pub amount: BaseToken,
    /// Stored mana.
    pub mana: Mana,
    /// Native tokens held.
    pub native_tokens: NativeTokens,
    /// Chain id; empty when created by the transaction holding this output.
    pub account_id: AccountId,
    /// Bumped by exactly one on every state transition.
    pub state_index: u32,
    /// Free-form state owned by the state controller.
    pub state_metadata: Vec<u8>,
    /// Number of foundries ever created by this account.
    pub foundry_counter: u32,
    /// State controller and governor.
    pub unlock_conditions: UnlockConditions,
    /// Mutable features.
    pub features: Features,
    /// Features fixed at genesis.
    pub immutable_features: Features,
}

impl AccountOutput {
    /// May perform state transitions.
    pub fn state_controller_address(&self) -> Option<&Address> {
        self.unlock_conditions.state_controller_address()
    }

    /// May perform governance transitions and destroy the account.
    pub fn governor_address(&self) -> Option<&Address> {
        self.unlock_conditions.governor_address()
    }

    pub(crate) fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        if self.account_id.is_empty() {
            if self.state_index != 0 || self.foundry_counter != 0 {
                return Err(SyntaxError::NewAccountWithState);
            }
            return Ok(());
        }
        let own_address = Address::account(self.account_id);
        if self.state_controller_address() == Some(&own_address)
            || self.governor_address() == Some(&own_address)
        {
            return Err(SyntaxError::SelfReferencingChain(ChainId::Account(self.account_id)));
        }
        Ok(())
    }
}
