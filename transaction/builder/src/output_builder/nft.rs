// Copyright (c) 2024 Botho Foundation

use super::{check_immutable, OutputParts};
use crate::error::OutputBuilderError;
use nova_transaction_types::{
    Address, BaseToken, Feature, Features, Mana, NativeToken, NftId, NftOutput, OutputId,
    UnlockCondition,
};

/// Builds an [NftOutput].
#[derive(Clone, Debug)]
pub struct NftOutputBuilder {
    parts: OutputParts,
    nft_id: NftId,
    previous_immutable: Option<Features>,
}

impl NftOutputBuilder {
    /// A new NFT holding `amount`, owned by `owner`.
    pub fn new(amount: BaseToken, owner: Address) -> Self {
        let mut parts = OutputParts::new(amount);
        parts.upsert_unlock_condition(UnlockCondition::address(owner));
        Self {
            parts,
            nft_id: NftId::EMPTY,
            previous_immutable: None,
        }
    }

    /// The next state of `previous`, stored under `output_id`.
    ///
    /// An empty NFT id is resolved from `output_id`.
    pub fn from_previous(previous: &NftOutput, output_id: &OutputId) -> Self {
        Self {
            parts: OutputParts::from_existing(
                previous.amount,
                previous.mana,
                &previous.native_tokens,
                &previous.unlock_conditions,
                &previous.features,
                &previous.immutable_features,
            ),
            nft_id: previous.nft_id.or_from_output_id(output_id),
            previous_immutable: Some(previous.immutable_features.clone()),
        }
    }

    /// Set the stored mana.
    pub fn with_mana(mut self, mana: Mana) -> Self {
        self.parts.mana = mana;
        self
    }

    /// Transfer the NFT to `owner`.
    pub fn with_owner(self, owner: Address) -> Self {
        self.add_unlock_condition(UnlockCondition::address(owner))
    }

    /// Add or replace an unlock condition.
    pub fn add_unlock_condition(mut self, condition: UnlockCondition) -> Self {
        self.parts.upsert_unlock_condition(condition);
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
    pub fn build(self) -> Result<NftOutput, OutputBuilderError> {
        let amount = self.parts.amount;
        let mana = self.parts.mana;
        let parts = self.parts.check()?;
        check_immutable(self.previous_immutable.as_ref(), &parts.immutable_features)?;
        Ok(NftOutput {
            amount,
            mana,
            native_tokens: parts.native_tokens,
            nft_id: self.nft_id,
            unlock_conditions: parts.unlock_conditions,
            features: parts.features,
            immutable_features: parts.immutable_features,
        })
    }
}
