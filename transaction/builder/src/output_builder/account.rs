// Copyright (c) 2024 Botho Foundation

use super::{check_immutable, OutputParts};
use crate::error::OutputBuilderError;
use nova_transaction_types::{
    AccountId, AccountOutput, Address, ArithmeticError, BaseToken, BlockIssuerFeature,
    BlockIssuerKey, Feature, FeatureKind, Features, Mana, NativeToken, OutputId, SlotIndex,
    StakingFeature, UnlockCondition,
};
use std::collections::BTreeSet;

/// Builds an [AccountOutput], either a new account or the next state of an
/// existing one.
///
/// Starting from a previous state, a state transition is requested with
/// [AccountOutputBuilder::next_state]; without it the result is a
/// governance transition.
#[derive(Clone, Debug)]
pub struct AccountOutputBuilder {
    parts: OutputParts,
    account_id: AccountId,
    state_index: u32,
    state_metadata: Vec<u8>,
    foundry_counter: u32,

    /// Requested state index increment.
    state_bump: u32,

    /// Foundries created in this transition.
    new_foundries: u32,

    /// Immutable features of the previous state, if any.
    previous_immutable: Option<Features>,
}

impl AccountOutputBuilder {
    /// A new account holding `amount`, controlled by `state_controller` and
    /// governed by `governor`.
    pub fn new(amount: BaseToken, state_controller: Address, governor: Address) -> Self {
        let mut parts = OutputParts::new(amount);
        parts.upsert_unlock_condition(UnlockCondition::StateControllerAddress(state_controller));
        parts.upsert_unlock_condition(UnlockCondition::GovernorAddress(governor));
        Self {
            parts,
            account_id: AccountId::EMPTY,
            state_index: 0,
            state_metadata: Vec::new(),
            foundry_counter: 0,
            state_bump: 0,
            new_foundries: 0,
            previous_immutable: None,
        }
    }

    /// The next state of `previous`, stored under `output_id`.
    ///
    /// An empty account id is resolved from `output_id`.
    pub fn from_previous(previous: &AccountOutput, output_id: &OutputId) -> Self {
        Self {
            parts: OutputParts::from_existing(
                previous.amount,
                previous.mana,
                &previous.native_tokens,
                &previous.unlock_conditions,
                &previous.features,
                &previous.immutable_features,
            ),
            account_id: previous.account_id.or_from_output_id(output_id),
            state_index: previous.state_index,
            state_metadata: previous.state_metadata.clone(),
            foundry_counter: previous.foundry_counter,
            state_bump: 0,
            new_foundries: 0,
            previous_immutable: Some(previous.immutable_features.clone()),
        }
    }

    /// The account id, empty for a new account.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Serial number the next created foundry must use.
    pub fn next_foundry_serial(&self) -> Option<u32> {
        self.foundry_counter.checked_add(self.new_foundries)
    }

    /// Set the base token amount.
    pub fn with_amount(mut self, amount: BaseToken) -> Self {
        self.parts.amount = amount;
        self
    }

    /// Set the stored mana.
    pub fn with_mana(mut self, mana: Mana) -> Self {
        self.parts.mana = mana;
        self
    }

    /// Replace the state controller.
    pub fn with_state_controller(mut self, address: Address) -> Self {
        self.parts
            .upsert_unlock_condition(UnlockCondition::StateControllerAddress(address));
        self
    }

    /// Replace the governor.
    pub fn with_governor(mut self, address: Address) -> Self {
        self.parts
            .upsert_unlock_condition(UnlockCondition::GovernorAddress(address));
        self
    }

    /// Replace the state metadata.
    pub fn with_state_metadata(mut self, state_metadata: impl Into<Vec<u8>>) -> Self {
        self.state_metadata = state_metadata.into();
        self
    }

    /// Perform a state transition: the state index is bumped by one.
    pub fn next_state(mut self) -> Self {
        self.state_bump = 1;
        self
    }

    /// Create `count` foundries in this transition, bumping the foundry
    /// counter. Implies a state transition.
    pub fn create_foundries(mut self, count: u32) -> Self {
        self.new_foundries = self.new_foundries.saturating_add(count);
        self.next_state()
    }

    /// Make the account a block issuer with `keys` until `expiry_slot`.
    pub fn with_block_issuer(
        mut self,
        keys: impl IntoIterator<Item = BlockIssuerKey>,
        expiry_slot: SlotIndex,
    ) -> Self {
        self.parts
            .upsert_feature(Feature::BlockIssuer(BlockIssuerFeature {
                keys: keys.into_iter().collect::<BTreeSet<_>>(),
                expiry_slot,
            }));
        self
    }

    /// Drop the block issuer feature.
    pub fn remove_block_issuer(mut self) -> Self {
        self.parts.remove_feature(FeatureKind::BlockIssuer);
        self
    }

    /// Stake towards a validator role.
    pub fn with_staking(mut self, staking: StakingFeature) -> Self {
        self.parts.upsert_feature(Feature::Staking(staking));
        self
    }

    /// Drop the staking feature.
    pub fn remove_staking(mut self) -> Self {
        self.parts.remove_feature(FeatureKind::Staking);
        self
    }

    /// Add or replace a mutable feature.
    pub fn add_feature(mut self, feature: Feature) -> Self {
        self.parts.upsert_feature(feature);
        self
    }

    /// Add or replace an immutable feature.
    pub fn add_immutable_feature(mut self, feature: Feature) -> Self {
        self.parts.upsert_immutable_feature(feature);
        self
    }

    /// Add or replace a native token balance.
    pub fn add_native_token(mut self, token: NativeToken) -> Self {
        self.parts.upsert_native_token(token);
        self
    }

    /// Sort and check the collected fields.
    pub fn build(self) -> Result<AccountOutput, OutputBuilderError> {
        let state_index = self
            .state_index
            .checked_add(self.state_bump)
            .ok_or(ArithmeticError::Overflow("state index"))?;
        let foundry_counter = self
            .foundry_counter
            .checked_add(self.new_foundries)
            .ok_or(ArithmeticError::Overflow("foundry counter"))?;
        let amount = self.parts.amount;
        let mana = self.parts.mana;
        let parts = self.parts.check()?;
        check_immutable(self.previous_immutable.as_ref(), &parts.immutable_features)?;
        Ok(AccountOutput {
            amount,
            mana,
            native_tokens: parts.native_tokens,
            account_id: self.account_id,
            state_index,
            state_metadata: self.state_metadata,
            foundry_counter,
            unlock_conditions: parts.unlock_conditions,
            features: parts.features,
            immutable_features: parts.immutable_features,
        })
    }
}
