// Copyright (c) 2024 Botho Foundation

use super::{check_immutable, OutputParts};
use crate::error::OutputBuilderError;
use nova_transaction_types::{
    AccountAddress, AccountId, BaseToken, Feature, Features, FoundryOutput, Mana, NativeToken,
    TokenScheme, UnlockCondition,
};

/// Builds a [FoundryOutput] anchored to an account.
#[derive(Clone, Debug)]
pub struct FoundryOutputBuilder {
    parts: OutputParts,
    serial_number: u32,
    token_scheme: TokenScheme,
    previous_immutable: Option<Features>,
}

impl FoundryOutputBuilder {
    /// A new foundry of `account_id`. The serial number must come from the
    /// account's foundry counter.
    pub fn new(
        amount: BaseToken,
        account_id: AccountId,
        serial_number: u32,
        token_scheme: TokenScheme,
    ) -> Self {
        let mut parts = OutputParts::new(amount);
        parts.upsert_unlock_condition(UnlockCondition::ImmutableAccountAddress(AccountAddress(
            account_id,
        )));
        Self {
            parts,
            serial_number,
            token_scheme,
            previous_immutable: None,
        }
    }

    /// The next state of `previous`.
    pub fn from_previous(previous: &FoundryOutput) -> Self {
        Self {
            parts: OutputParts::from_existing(
                previous.amount,
                previous.mana,
                &previous.native_tokens,
                &previous.unlock_conditions,
                &previous.features,
                &previous.immutable_features,
            ),
            serial_number: previous.serial_number,
            token_scheme: previous.token_scheme.clone(),
            previous_immutable: Some(previous.immutable_features.clone()),
        }
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

    /// Replace the token scheme, e.g. after minting or melting.
    pub fn with_token_scheme(mut self, token_scheme: TokenScheme) -> Self {
        self.token_scheme = token_scheme;
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
    pub fn build(self) -> Result<FoundryOutput, OutputBuilderError> {
        let amount = self.parts.amount;
        let mana = self.parts.mana;
        let parts = self.parts.check()?;
        check_immutable(self.previous_immutable.as_ref(), &parts.immutable_features)?;
        Ok(FoundryOutput {
            amount,
            mana,
            native_tokens: parts.native_tokens,
            serial_number: self.serial_number,
            token_scheme: self.token_scheme,
            unlock_conditions: parts.unlock_conditions,
            features: parts.features,
            immutable_features: parts.immutable_features,
        })
    }
}
