// Copyright (c) 2024 Botho Foundation

//! Builders for the outputs a transaction creates.
//!
//! Features, unlock conditions and native tokens may be added in any order.
//! Adding a second entry of the same kind replaces the first; `build` sorts
//! and checks them.

mod account;
mod basic;
mod foundry;
mod nft;

pub use account::AccountOutputBuilder;
pub use basic::BasicOutputBuilder;
pub use foundry::FoundryOutputBuilder;
pub use nft::NftOutputBuilder;

use crate::error::OutputBuilderError;
use nova_transaction_types::{
    BaseToken, Feature, FeatureKind, Features, Mana, NativeToken, NativeTokens, UnlockCondition,
    UnlockConditions,
};

/// Fields every output kind shares.
#[derive(Clone, Debug, Default)]
struct OutputParts {
    amount: BaseToken,
    mana: Mana,
    native_tokens: Vec<NativeToken>,
    unlock_conditions: Vec<UnlockCondition>,
    features: Vec<Feature>,
    immutable_features: Vec<Feature>,
}

/// [OutputParts] after sorting and checking.
struct CheckedParts {
    native_tokens: NativeTokens,
    unlock_conditions: UnlockConditions,
    features: Features,
    immutable_features: Features,
}

impl OutputParts {
    fn new(amount: BaseToken) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    fn from_existing(
        amount: BaseToken,
        mana: Mana,
        native_tokens: &NativeTokens,
        unlock_conditions: &UnlockConditions,
        features: &Features,
        immutable_features: &Features,
    ) -> Self {
        Self {
            amount,
            mana,
            native_tokens: native_tokens.iter().copied().collect(),
            unlock_conditions: unlock_conditions.iter().copied().collect(),
            features: features.iter().cloned().collect(),
            immutable_features: immutable_features.iter().cloned().collect(),
        }
    }

    fn upsert_native_token(&mut self, token: NativeToken) {
        self.native_tokens.retain(|existing| existing.id != token.id);
        self.native_tokens.push(token);
    }

    fn upsert_unlock_condition(&mut self, condition: UnlockCondition) {
        self.unlock_conditions
            .retain(|existing| existing.kind() != condition.kind());
        self.unlock_conditions.push(condition);
    }

    fn upsert_feature(&mut self, feature: Feature) {
        upsert_feature(&mut self.features, feature);
    }

    fn upsert_immutable_feature(&mut self, feature: Feature) {
        upsert_feature(&mut self.immutable_features, feature);
    }

    fn remove_feature(&mut self, kind: FeatureKind) {
        self.features.retain(|existing| existing.kind() != kind);
    }

    fn check(self) -> Result<CheckedParts, OutputBuilderError> {
        Ok(CheckedParts {
            native_tokens: NativeTokens::from_vec(self.native_tokens)?,
            unlock_conditions: UnlockConditions::from_vec(self.unlock_conditions)?,
            features: Features::from_vec(self.features)?,
            immutable_features: Features::from_vec(self.immutable_features)?,
        })
    }
}

fn upsert_feature(features: &mut Vec<Feature>, feature: Feature) {
    features.retain(|existing| existing.kind() != feature.kind());
    features.push(feature);
}

/// Immutable features of a transitioned chain must equal the previous ones.
fn check_immutable(
    previous: Option<&Features>,
    next: &Features,
) -> Result<(), OutputBuilderError> {
    match previous {
        Some(previous) if previous != next => Err(OutputBuilderError::ImmutableFeaturesChanged),
        _ => Ok(()),
    }
}
