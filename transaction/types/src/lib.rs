// Copyright (c) 2024 Botho Foundation

//! Ledger value types and the output object model: identifiers, amounts,
//! addresses, features, unlock conditions, native tokens, token schemes,
//! outputs, protocol parameters and the mana decay engine.

#![deny(missing_docs)]

pub mod address;
pub mod alias;
pub mod amount;
pub mod chain;
pub mod codec;
pub mod constants;
pub mod error;
pub mod feature;
pub mod hash;
pub mod ids;
pub mod mana;
pub mod native_token;
pub mod output;
pub mod protocol_parameters;
pub mod time;
pub mod token_scheme;
pub mod unlock_condition;
pub mod work_score;

pub use address::{AccountAddress, Address, AddressKind, Ed25519Address, NftAddress};
pub use alias::{AliasRegistry, Aliasable};
pub use amount::{
    ArithmeticError, BaseToken, BlockIssuanceCredits, EpochIndex, Mana, SlotIndex,
};
pub use chain::{ChainId, ChainTransitionType};
pub use error::{CodecError, SyntaxError};
pub use feature::{
    BlockIssuerFeature, BlockIssuerKey, Feature, FeatureKind, Features, IssuerFeature,
    MetadataFeature, SenderFeature, StakingFeature, TagFeature,
};
pub use ids::{
    AccountId, CommitmentId, DelegationId, FoundryId, Identifier, NativeTokenId, NftId, OutputId,
    TransactionId,
};
pub use mana::{ManaDecayProvider, ManaError};
pub use native_token::{NativeToken, NativeTokenSum, NativeTokens};
pub use output::{
    AccountOutput, BasicOutput, DelegationOutput, FoundryOutput, NftOutput, Output, OutputKind,
};
pub use primitive_types::U256;
pub use protocol_parameters::{ProtocolParameters, ProtocolParametersError, RentStructure};
pub use time::TimeProvider;
pub use token_scheme::{SimpleTokenScheme, TokenScheme, TokenSchemeError};
pub use unlock_condition::{UnlockCondition, UnlockConditionKind, UnlockConditions};
pub use work_score::{WorkScore, WorkScoreStructure};
