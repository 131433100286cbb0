// Copyright (c) 2024 Botho Foundation

use super::OutputParts;
use crate::error::OutputBuilderError;
use nova_transaction_types::{
    Address, BaseToken, BasicOutput, Feature, Mana, NativeToken, UnlockCondition,
};

/// Builds a [BasicOutput].
#[derive(Clone, Debug)]
pub struct BasicOutputBuilder {
    parts: OutputParts,
}

impl BasicOutputBuilder {
    /// An output holding `amount` base tokens.
    pub fn new(amount: BaseToken) -> Self {
        Self {
            parts: OutputParts::new(amount),
        }
    }

    /// Set the stored mana.
    pub fn with_mana(mut self, mana: Mana) -> Self {
        self.parts.mana = mana;
        self
    }

    /// Lock the output to `address`.
    pub fn with_address(self, address: impl Into<Address>) -> Self {
        self.add_unlock_condition(UnlockCondition::address(address))
    }

    /// Add or replace an unlock condition.
    pub fn add_unlock_condition(mut self, condition: UnlockCondition) -> Self {
        self.parts.upsert_unlock_condition(condition);
        self
    }

    /// Add or replace a feature.
    pub fn add_feature(mut self, feature: Feature) -> Self {
        self.parts.upsert_feature(feature);
        self
    }

    /// Add or replace a native token balance.
    pub fn add_native_token(mut self, token: NativeToken) -> Self {
        self.parts.upsert_native_token(token);
        self
    }

    /// Sort and check the collected fields.
    pub fn build(self) -> Result<BasicOutput, OutputBuilderError> {
        let amount = self.parts.amount;
        let mana = self.parts.mana;
        let parts = self.parts.check()?;
        Ok(BasicOutput {
            amount,
            mana,
            native_tokens: parts.native_tokens,
            unlock_conditions: parts.unlock_conditions,
            features: parts.features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_transaction_types::{
        AccountId, FeatureKind, FoundryId, NativeTokenId, NftId, SenderFeature, SyntaxError,
        TagFeature, UnlockConditionKind,
    };

    fn owner() -> Address {
        Address::account(AccountId([1u8; 32]))
    }

    fn token() -> NativeTokenId {
        FoundryId::new(AccountId([1u8; 32]), 0, 0)
    }

    #[test]
    fn test_fields_are_sorted() {
        let output = BasicOutputBuilder::new(100)
            .with_mana(3)
            .add_unlock_condition(UnlockCondition::timelock(9))
            .with_address(owner())
            .add_feature(Feature::Tag(TagFeature { tag: b"t".to_vec() }))
            .add_feature(Feature::Sender(SenderFeature { address: owner() }))
            .build()
            .unwrap();

        assert_eq!(output.mana, 3);
        let kinds: Vec<_> = output.unlock_conditions.iter().map(UnlockCondition::kind).collect();
        assert_eq!(kinds, vec![UnlockConditionKind::Address, UnlockConditionKind::Timelock]);
        let kinds: Vec<_> = output.features.iter().map(Feature::kind).collect();
        assert_eq!(kinds, vec![FeatureKind::Sender, FeatureKind::Tag]);
        assert_eq!(output.address(), Some(&owner()));
    }

    #[test]
    fn test_same_kind_replaces() {
        let other = Address::nft(NftId([2u8; 32]));
        let output = BasicOutputBuilder::new(100)
            .with_address(owner())
            .with_address(other)
            .add_native_token(NativeToken::new(token(), 5u64))
            .add_native_token(NativeToken::new(token(), 7u64))
            .build()
            .unwrap();

        assert_eq!(output.address(), Some(&other));
        assert_eq!(output.native_tokens.len(), 1);
        assert_eq!(output.native_tokens.get(&token()), Some(&7u64.into()));
    }

    #[test]
    fn test_invalid_fields_are_rejected() {
        let result = BasicOutputBuilder::new(100)
            .with_address(owner())
            .add_native_token(NativeToken::new(token(), 0u64))
            .build();
        assert_eq!(
            result,
            Err(OutputBuilderError::Syntax(SyntaxError::ZeroNativeTokenAmount(token())))
        );
    }
}
