// Copyright (c) 2024 Botho Foundation

use super::{OutputKind, OutputRules};
use crate::{
    address::Address,
    amount::{BaseToken, Mana},
    chain::ChainId,
    error::SyntaxError,
    feature::{FeatureKind, Features},
    ids::NftId,
    native_token::NativeTokens,
    unlock_condition::{UnlockConditionKind, UnlockConditions},
};
use serde::{Deserialize, Serialize};

pub(crate) const RULES: OutputRules = OutputRules {
    kind: OutputKind::Nft,
    required_conditions: &[UnlockConditionKind::Address],
    allowed_conditions: &[
        UnlockConditionKind::Address,
        UnlockConditionKind::StorageDepositReturn,
        UnlockConditionKind::Timelock,
        UnlockConditionKind::Expiration,
    ],
    features: &[FeatureKind::Sender, FeatureKind::Metadata, FeatureKind::Tag],
    immutable_features: &[FeatureKind::Issuer, FeatureKind::Metadata],
};

/// A non-fungible token: a chain output with a unique id and immutable
/// metadata.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct NftOutput {
    /// Base tokens held.
    pub amount: BaseToken,
    /// Stored mana.
    pub mana: Mana,
    /// Native tokens held.
    pub native_tokens: NativeTokens,
    /// Chain id; empty when created by the transaction holding this output.
    pub nft_id: NftId,
    /// Unlock conditions.
    pub unlock_conditions: UnlockConditions,
    /// Mutable features.
    pub features: Features,
    /// Features fixed at genesis.
    pub immutable_features: Features,
}

impl NftOutput {
    /// The owner named by the address condition.
    pub fn address(&self) -> Option<&Address> {
        self.unlock_conditions.address()
    }

    pub(crate) fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        if self.nft_id.is_empty() {
            return Ok(());
        }
        let own_address = Address::nft(self.nft_id);
        let conditions = &self.unlock_conditions;
        let self_referencing = conditions.address() == Some(&own_address)
            || conditions
                .storage_deposit_return()
                .is_some_and(|sdr| sdr.return_address == own_address)
            || conditions
                .expiration()
                .is_some_and(|expiration| expiration.return_address == own_address);
        if self_referencing {
            return Err(SyntaxError::SelfReferencingChain(ChainId::Nft(self.nft_id)));
        }
        Ok(())
    }
}
