// Copyright (c) 2024 Botho Foundation

//! Outputs: the unspent records of the ledger.

mod account;
mod basic;
mod delegation;
mod foundry;
mod nft;

pub use account::AccountOutput;
pub use basic::BasicOutput;
pub use delegation::DelegationOutput;
pub use foundry::FoundryOutput;
pub use nft::NftOutput;

use crate::{
    amount::{safe_add, safe_mul, ArithmeticError, BaseToken, Mana},
    chain::ChainId,
    codec,
    constants::{OUTPUT_ID_OFFSET_BYTES, OUTPUT_METADATA_OFFSET_BYTES},
    error::SyntaxError,
    feature::{FeatureKind, Features},
    ids::OutputId,
    native_token::{NativeToken, NativeTokens},
    protocol_parameters::{ProtocolParameters, RentStructure},
    unlock_condition::{UnlockConditionKind, UnlockConditions},
    work_score::{WorkScore, WorkScoreStructure},
};
use serde::{Deserialize, Serialize};

static EMPTY_NATIVE_TOKENS: NativeTokens = NativeTokens::empty();
static EMPTY_FEATURES: Features = Features::empty();

/// Output kinds, by their kind byte.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum OutputKind {
    /// [BasicOutput]
    Basic = 3,
    /// [AccountOutput]
    Account = 4,
    /// [FoundryOutput]
    Foundry = 5,
    /// [NftOutput]
    Nft = 6,
    /// [DelegationOutput]
    Delegation = 7,
}

/// Which unlock conditions and features an output kind accepts.
pub(crate) struct OutputRules {
    pub kind: OutputKind,
    pub required_conditions: &'static [UnlockConditionKind],
    pub allowed_conditions: &'static [UnlockConditionKind],
    pub features: &'static [FeatureKind],
    pub immutable_features: &'static [FeatureKind],
}

impl OutputRules {
    fn check(
        &self,
        conditions: &UnlockConditions,
        features: &Features,
        immutable_features: Option<&Features>,
    ) -> Result<(), SyntaxError> {
        for condition in self.required_conditions {
            if conditions.get(*condition).is_none() {
                return Err(SyntaxError::MissingUnlockCondition {
                    output: self.kind,
                    condition: *condition,
                });
            }
        }
        conditions
            .check_allowed(self.allowed_conditions)
            .map_err(|condition| SyntaxError::DisallowedUnlockCondition {
                output: self.kind,
                condition,
            })?;
        features
            .check_allowed(self.features)
            .map_err(|feature| SyntaxError::DisallowedFeature {
                output: self.kind,
                feature,
            })?;
        if let Some(immutable) = immutable_features {
            immutable
                .check_allowed(self.immutable_features)
                .map_err(|feature| SyntaxError::DisallowedImmutableFeature {
                    output: self.kind,
                    feature,
                })?;
        }
        Ok(())
    }
}

/// An output of any kind.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Plain value holder.
    Basic(BasicOutput),
    /// Account chain.
    Account(AccountOutput),
    /// Foundry chain.
    Foundry(FoundryOutput),
    /// NFT chain.
    Nft(NftOutput),
    /// Delegation to a validator.
    Delegation(DelegationOutput),
}

impl Output {
    /// The kind of output.
    pub fn kind(&self) -> OutputKind {
        match self {
            Output::Basic(_) => OutputKind::Basic,
            Output::Account(_) => OutputKind::Account,
            Output::Foundry(_) => OutputKind::Foundry,
            Output::Nft(_) => OutputKind::Nft,
            Output::Delegation(_) => OutputKind::Delegation,
        }
    }

    /// Base tokens held.
    pub fn amount(&self) -> BaseToken {
        match self {
            Output::Basic(output) => output.amount,
            Output::Account(output) => output.amount,
            Output::Foundry(output) => output.amount,
            Output::Nft(output) => output.amount,
            Output::Delegation(output) => output.amount,
        }
    }

    /// Stored mana.
    pub fn mana(&self) -> Mana {
        match self {
            Output::Basic(output) => output.mana,
            Output::Account(output) => output.mana,
            Output::Foundry(output) => output.mana,
            Output::Nft(output) => output.mana,
            Output::Delegation(output) => output.mana,
        }
    }

    /// Native token list. Delegations hold none.
    pub fn native_tokens(&self) -> &NativeTokens {
        match self {
            Output::Basic(output) => &output.native_tokens,
            Output::Account(output) => &output.native_tokens,
            Output::Foundry(output) => &output.native_tokens,
            Output::Nft(output) => &output.native_tokens,
            Output::Delegation(_) => &EMPTY_NATIVE_TOKENS,
        }
    }

    /// All native tokens held: the list plus a native token feature.
    pub fn all_native_tokens(&self) -> impl Iterator<Item = &NativeToken> {
        self.native_tokens()
            .iter()
            .chain(self.features().native_token())
    }

    /// Unlock conditions.
    pub fn unlock_conditions(&self) -> &UnlockConditions {
        match self {
            Output::Basic(output) => &output.unlock_conditions,
            Output::Account(output) => &output.unlock_conditions,
            Output::Foundry(output) => &output.unlock_conditions,
            Output::Nft(output) => &output.unlock_conditions,
            Output::Delegation(output) => &output.unlock_conditions,
        }
    }

    /// Mutable features. Delegations have none.
    pub fn features(&self) -> &Features {
        match self {
            Output::Basic(output) => &output.features,
            Output::Account(output) => &output.features,
            Output::Foundry(output) => &output.features,
            Output::Nft(output) => &output.features,
            Output::Delegation(_) => &EMPTY_FEATURES,
        }
    }

    /// Immutable features of chain outputs.
    pub fn immutable_features(&self) -> Option<&Features> {
        match self {
            Output::Account(output) => Some(&output.immutable_features),
            Output::Foundry(output) => Some(&output.immutable_features),
            Output::Nft(output) => Some(&output.immutable_features),
            Output::Basic(_) | Output::Delegation(_) => None,
        }
    }

    /// The chain id as stored, which is empty for new accounts and NFTs.
    pub fn chain_id(&self) -> Option<ChainId> {
        match self {
            Output::Account(output) => Some(ChainId::Account(output.account_id)),
            Output::Foundry(output) => output.foundry_id().map(ChainId::Foundry),
            Output::Nft(output) => Some(ChainId::Nft(output.nft_id)),
            Output::Basic(_) | Output::Delegation(_) => None,
        }
    }

    /// The chain id, with an empty placeholder resolved against the id of
    /// this output.
    pub fn resolved_chain_id(&self, output_id: &OutputId) -> Option<ChainId> {
        self.chain_id().map(|id| id.or_from_output_id(output_id))
    }

    /// Minimum amount this output must hold for its size.
    pub fn min_deposit(&self, rent: &RentStructure) -> Result<BaseToken, SyntaxError> {
        let size = codec::encoded_len(self)?;
        let key_bytes = safe_mul(
            u64::from(rent.vbyte_factor_key),
            OUTPUT_ID_OFFSET_BYTES,
            "storage score",
        )?;
        let data_bytes = safe_mul(
            u64::from(rent.vbyte_factor_data),
            safe_add(OUTPUT_METADATA_OFFSET_BYTES, size, "storage score")?,
            "storage score",
        )?;
        let vbytes = safe_add(key_bytes, data_bytes, "storage score")?;
        Ok(safe_mul(vbytes, u64::from(rent.vbyte_cost), "storage deposit")?)
    }

    /// Check structure, kind-specific rules, the storage deposit and the
    /// token supply bound.
    pub fn syntactic_validate(&self, params: &ProtocolParameters) -> Result<(), SyntaxError> {
        let rules = match self {
            Output::Basic(_) => &basic::RULES,
            Output::Account(_) => &account::RULES,
            Output::Foundry(_) => &foundry::RULES,
            Output::Nft(_) => &nft::RULES,
            Output::Delegation(_) => &delegation::RULES,
        };
        rules.check(self.unlock_conditions(), self.features(), self.immutable_features())?;

        match self {
            Output::Basic(_) => {}
            Output::Account(output) => output.syntactic_validate()?,
            Output::Foundry(output) => output.syntactic_validate()?,
            Output::Nft(output) => output.syntactic_validate()?,
            Output::Delegation(output) => output.syntactic_validate()?,
        }

        let amount = self.amount();
        if let Some(sdr) = self.unlock_conditions().storage_deposit_return() {
            if sdr.amount > amount {
                return Err(SyntaxError::StorageDepositReturnExceedsAmount {
                    amount,
                    return_amount: sdr.amount,
                });
            }
        }
        if amount > params.token_supply {
            return Err(SyntaxError::AmountExceedsSupply {
                amount,
                supply: params.token_supply,
            });
        }
        let required = self.min_deposit(&params.rent_structure)?;
        if amount < required {
            return Err(SyntaxError::InsufficientStorageDeposit { amount, required });
        }
        Ok(())
    }

    /// Work score of processing this output.
    pub fn work_score(&self, structure: &WorkScoreStructure) -> Result<WorkScore, ArithmeticError> {
        let native_tokens = structure
            .native_token
            .multiply(self.native_tokens().len())?;
        structure
            .output
            .add(native_tokens)?
            .add(self.features().work_score(structure)?)
    }

    /// The basic output, if this is one.
    pub fn as_basic(&self) -> Option<&BasicOutput> {
        match self {
            Output::Basic(output) => Some(output),
            _ => None,
        }
    }

    /// The account output, if this is one.
    pub fn as_account(&self) -> Option<&AccountOutput> {
        match self {
            Output::Account(output) => Some(output),
            _ => None,
        }
    }

    /// The foundry output, if this is one.
    pub fn as_foundry(&self) -> Option<&FoundryOutput> {
        match self {
            Output::Foundry(output) => Some(output),
            _ => None,
        }
    }

    /// The NFT output, if this is one.
    pub fn as_nft(&self) -> Option<&NftOutput> {
        match self {
            Output::Nft(output) => Some(output),
            _ => None,
        }
    }
}

impl From<BasicOutput> for Output {
    fn from(output: BasicOutput) -> Self {
        Output::Basic(output)
    }
}

impl From<AccountOutput> for Output {
    fn from(output: AccountOutput) -> Self {
        Output::Account(output)
    }
}

impl From<FoundryOutput> for Output {
    fn from(output: FoundryOutput) -> Self {
        Output::Foundry(output)
    }
}

impl From<NftOutput> for Output {
    fn from(output: NftOutput) -> Self {
        Output::Nft(output)
    }
}

impl From<DelegationOutput> for Output {
    fn from(output: DelegationOutput) -> Self {
        Output::Delegation(output)
    }
}

#[cfg(test)]
mod tests;
