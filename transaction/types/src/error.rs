// Copyright (c) 2024 Botho Foundation

//! Structural errors in ledger records.

use crate::{
    amount::{ArithmeticError, BaseToken, EpochIndex},
    chain::ChainId,
    feature::FeatureKind,
    ids::{AccountId, NativeTokenId, OutputId},
    output::OutputKind,
    token_scheme::TokenSchemeError,
    unlock_condition::UnlockConditionKind,
};
use displaydoc::Display;

/// Encoding or decoding a record failed.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum CodecError {
    /// Binary encoding failed: {0}
    Encode(String),

    /// Binary decoding failed: {0}
    Decode(String),

    /// JSON: {0}
    Json(String),
}

impl std::error::Error for CodecError {}

/// A record violates a structural, size or uniqueness rule.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum SyntaxError {
    /// Duplicate feature kind {0:?}
    DuplicateFeature(FeatureKind),

    /// Duplicate unlock condition kind {0:?}
    DuplicateUnlockCondition(UnlockConditionKind),

    /// Feature {feature:?} is not allowed on {output:?} outputs
    DisallowedFeature {
        /// Output kind.
        output: OutputKind,
        /// Offending feature kind.
        feature: FeatureKind,
    },

    /// Immutable feature {feature:?} is not allowed on {output:?} outputs
    DisallowedImmutableFeature {
        /// Output kind.
        output: OutputKind,
        /// Offending feature kind.
        feature: FeatureKind,
    },

    /// Unlock condition {condition:?} is not allowed on {output:?} outputs
    DisallowedUnlockCondition {
        /// Output kind.
        output: OutputKind,
        /// Offending condition kind.
        condition: UnlockConditionKind,
    },

    /// {output:?} outputs require a {condition:?} unlock condition
    MissingUnlockCondition {
        /// Output kind.
        output: OutputKind,
        /// Missing condition kind.
        condition: UnlockConditionKind,
    },

    /// {0:?} unlock condition slot must be non-zero
    ZeroSlot(UnlockConditionKind),

    /// Tag length {0} is outside 1..=64
    InvalidTag(usize),

    /// Invalid metadata: {0}
    InvalidMetadata(&'static str),

    /// Block issuer key count {0} is outside 1..=128
    InvalidBlockIssuerKeyCount(usize),

    /// Staking start epoch {start} must precede end epoch {end}
    InvalidStakingEpochs {
        /// Start epoch.
        start: EpochIndex,
        /// End epoch.
        end: EpochIndex,
    },

    /// Duplicate native token {0}
    DuplicateNativeToken(NativeTokenId),

    /// {0} native tokens exceed the per-output maximum
    TooManyNativeTokens(usize),

    /// Native token {0} has a zero amount
    ZeroNativeTokenAmount(NativeTokenId),

    /// Token scheme: {0}
    TokenScheme(TokenSchemeError),

    /// Amount {amount} is below the storage deposit {required}
    InsufficientStorageDeposit {
        /// Output amount.
        amount: BaseToken,
        /// Minimum deposit for the output's size.
        required: BaseToken,
    },

    /// Amount {amount} exceeds the token supply {supply}
    AmountExceedsSupply {
        /// Offending amount.
        amount: BaseToken,
        /// Protocol token supply.
        supply: BaseToken,
    },

    /// Storage deposit return {return_amount} exceeds output amount {amount}
    StorageDepositReturnExceedsAmount {
        /// Output amount.
        amount: BaseToken,
        /// Amount to return.
        return_amount: BaseToken,
    },

    /// {0} is locked to its own address
    SelfReferencingChain(ChainId),

    /// A new account must have zero state index and foundry counter
    NewAccountWithState,

    /// Delegated amount {delegated} exceeds the output amount {amount}
    DelegatedAmountExceedsAmount {
        /// Output amount.
        amount: BaseToken,
        /// Delegated amount.
        delegated: BaseToken,
    },

    /// Transaction has no inputs
    NoInputs,

    /// {0} inputs exceed the maximum
    TooManyInputs(usize),

    /// Input {0} is referenced twice
    DuplicateInput(OutputId),

    /// Transaction has no outputs
    NoOutputs,

    /// {0} outputs exceed the maximum
    TooManyOutputs(usize),

    /// {0} context inputs exceed the maximum
    TooManyContextInputs(usize),

    /// Context input at index {0} is duplicated
    DuplicateContextInput(usize),

    /// {0} allotments exceed the maximum
    TooManyAllotments(usize),

    /// Account {0} receives more than one allotment
    DuplicateAllotment(AccountId),

    /// Invalid tagged data payload: {0}
    InvalidTaggedData(&'static str),

    /// {unlocks} unlocks for {inputs} inputs
    UnlockCountMismatch {
        /// Number of inputs.
        inputs: usize,
        /// Number of unlocks.
        unlocks: usize,
    },

    /// Unlock {index} references {reference}, which is not an earlier valid target
    InvalidUnlockReference {
        /// Position of the referential unlock.
        index: usize,
        /// Referenced position.
        reference: u16,
    },

    /// Signature unlock {0} repeats an earlier signature
    DuplicateSignatureUnlock(usize),

    /// Network id {actual} does not match {expected}
    NetworkIdMismatch {
        /// Network id of the protocol parameters.
        expected: u64,
        /// Network id of the transaction.
        actual: u64,
    },

    /// Arithmetic: {0}
    Arithmetic(ArithmeticError),

    /// Codec: {0}
    Codec(CodecError),
}

impl std::error::Error for SyntaxError {}

impl From<TokenSchemeError> for SyntaxError {
    fn from(src: TokenSchemeError) -> Self {
        Self::TokenScheme(src)
    }
}

impl From<ArithmeticError> for SyntaxError {
    fn from(src: ArithmeticError) -> Self {
        Self::Arithmetic(src)
    }
}

impl From<CodecError> for SyntaxError {
    fn from(src: CodecError) -> Self {
        Self::Codec(src)
    }
}
