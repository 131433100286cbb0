// Copyright (c) 2024 Botho Foundation

use displaydoc::Display;
use nova_transaction_core::SignerError;
use nova_transaction_types::{Address, ArithmeticError, CodecError, OutputId, SyntaxError};

/// An error that can occur when using the TransactionBuilder
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum TxBuilderError {
    /// Protocol parameters were not set
    MissingProtocolParameters,

    /// No signer was supplied
    MissingSigner,

    /// No inputs
    NoInputs,

    /// Input {0} was added twice
    DuplicateInput(OutputId),

    /// More than {0} inputs
    TooManyInputs(usize),

    /// More than {0} outputs
    TooManyOutputs(usize),

    /// Network id {actual} does not match the protocol parameters' {expected}
    NetworkIdMismatch {
        /// Network id of the protocol parameters.
        expected: u64,
        /// Network id the builder was created for.
        actual: u64,
    },

    /// Input {index}: chain address {address} is not unlocked by an earlier input
    ChainNotUnlocked {
        /// Input position.
        index: usize,
        /// Owning chain address.
        address: Address,
    },

    /// Input position {0} cannot be referenced by an unlock
    ReferenceOutOfRange(usize),

    /// Invalid record: {0}
    Syntax(SyntaxError),

    /// Signer: {0}
    Signer(SignerError),

    /// Codec: {0}
    Codec(CodecError),
}

impl std::error::Error for TxBuilderError {}

impl From<SyntaxError> for TxBuilderError {
    fn from(src: SyntaxError) -> Self {
        Self::Syntax(src)
    }
}

impl From<SignerError> for TxBuilderError {
    fn from(src: SignerError) -> Self {
        Self::Signer(src)
    }
}

impl From<CodecError> for TxBuilderError {
    fn from(src: CodecError) -> Self {
        Self::Codec(src)
    }
}

/// An error that can occur when building an output
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum OutputBuilderError {
    /// Invalid output: {0}
    Syntax(SyntaxError),

    /// Immutable features differ from the previous state
    ImmutableFeaturesChanged,

    /// Arithmetic: {0}
    Arithmetic(ArithmeticError),
}

impl std::error::Error for OutputBuilderError {}

impl From<SyntaxError> for OutputBuilderError {
    fn from(src: SyntaxError) -> Self {
        Self::Syntax(src)
    }
}

impl From<ArithmeticError> for OutputBuilderError {
    fn from(src: ArithmeticError) -> Self {
        Self::Arithmetic(src)
    }
}
