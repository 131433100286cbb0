// Copyright (c) 2024 Botho Foundation

use crate::signature::SignatureError;
use displaydoc::Display;
use nova_transaction_types::{
    AccountId, Address, ArithmeticError, BaseToken, BlockIssuanceCredits, ChainId, CodecError,
    Mana, ManaError, NativeTokenId, OutputId, SlotIndex, SyntaxError, TokenSchemeError, U256,
};

/// Type alias for transaction validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// The broad class a validation failure belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ViolationKind {
    /// A record violates a structural, size or uniqueness rule.
    MalformedInput,
    /// An input was not properly unlocked.
    UnauthorizedUnlock,
    /// Base tokens, native tokens or mana are not conserved.
    UnbalancedValue,
    /// A chain output moved to a state it may not reach.
    InvalidChainTransition,
    /// A block issuer account broke its credit or mana rules.
    InvalidBlockIssuerTransition,
    /// A sum or product left its value range.
    ArithmeticOverflow,
}

/// Reasons why a transaction may fail to be valid with respect to the
/// ledger state it consumes.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ValidationError {
    /// Malformed transaction: {0}
    Syntax(SyntaxError),

    /// Input {0} could not be resolved
    InputNotResolved(OutputId),

    /// Inputs commitment does not match the consumed outputs
    InputsCommitmentMismatch,

    /// Chain {0} is consumed more than once
    DuplicateChainInput(ChainId),

    /// Chain {0} is created more than once
    DuplicateChainOutput(ChainId),

    /// Input {index} is timelocked until slot {until}
    TimelockNotExpired {
        /// Input position.
        index: usize,
        /// Slot the timelock lifts.
        until: SlotIndex,
    },

    /// Input {0} has no owner
    MissingOwner(usize),

    /// Input {index}: {error}
    InvalidSignature {
        /// Input position.
        index: usize,
        /// Why the signature was rejected.
        error: SignatureError,
    },

    /// Input {index} owned by {address} cannot be opened with a {unlock} unlock
    WrongUnlockKind {
        /// Input position.
        index: usize,
        /// Owner of the input.
        address: Address,
        /// Kind of unlock supplied.
        unlock: &'static str,
    },

    /// Input {index}: {address} was already signed for at input {first}
    SignatureReused {
        /// Input position.
        index: usize,
        /// Owner of the input.
        address: Address,
        /// Position of the first signature.
        first: usize,
    },

    /// Input {index}: unlock {reference} does not unlock {address}
    InvalidUnlockReference {
        /// Input position.
        index: usize,
        /// Referenced position.
        reference: u16,
        /// Owner of the input.
        address: Address,
    },

    /// Input {index}: chain address {address} is not unlocked by an earlier input
    ChainAddressNotUnlocked {
        /// Input position.
        index: usize,
        /// Owning chain address.
        address: Address,
    },

    /// Sender {0} of an output is not unlocked
    SenderNotUnlocked(Address),

    /// Base tokens unbalanced: inputs {input}, outputs {output}
    UnbalancedBaseTokens {
        /// Sum over inputs.
        input: BaseToken,
        /// Sum over outputs.
        output: BaseToken,
    },

    /// Storage deposit return to {address} requires {required} but only {returned} is returned
    StorageDepositReturnUnfulfilled {
        /// Return address.
        address: Address,
        /// Amount owed.
        required: BaseToken,
        /// Amount sent back in simple transfers.
        returned: BaseToken,
    },

    /// {0} distinct native tokens exceed the per-transaction maximum
    TooManyNativeTokens(usize),

    /// Native token {id} unbalanced: inputs {input}, outputs {output}
    UnbalancedNativeToken {
        /// Token id.
        id: NativeTokenId,
        /// Sum over inputs.
        input: U256,
        /// Sum over outputs.
        output: U256,
    },

    /// Input {index} was created in slot {created}, after the transaction slot {creation_slot}
    InputCreatedAfterTransaction {
        /// Input position.
        index: usize,
        /// Slot the input was created in.
        created: SlotIndex,
        /// Creation slot of the transaction.
        creation_slot: SlotIndex,
    },

    /// Mana unbalanced: {available} available, {required} required
    UnbalancedMana {
        /// Decayed stored plus potential mana of the inputs.
        available: Mana,
        /// Output mana plus allotments.
        required: Mana,
    },

    /// Chain {chain}: {error}
    ChainTransition {
        /// Offending chain.
        chain: ChainId,
        /// Rule that was broken.
        error: ChainTransitionError,
    },

    /// Block issuer account {account}: {error}
    BlockIssuer {
        /// Offending account.
        account: AccountId,
        /// Rule that was broken.
        error: BlockIssuerError,
    },

    /// Mana: {0}
    Mana(ManaError),

    /// Arithmetic: {0}
    Arithmetic(ArithmeticError),

    /// Codec: {0}
    Codec(CodecError),
}

impl ValidationError {
    /// The class of this failure.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::Syntax(SyntaxError::Arithmetic(_))
            | Self::Mana(ManaError::Arithmetic(_))
            | Self::Arithmetic(_) => ViolationKind::ArithmeticOverflow,
            Self::Syntax(_)
            | Self::InputNotResolved(_)
            | Self::InputsCommitmentMismatch
            | Self::DuplicateChainInput(_)
            | Self::DuplicateChainOutput(_)
            | Self::MissingOwner(_)
            | Self::TooManyNativeTokens(_)
            | Self::Mana(_)
            | Self::Codec(_) => ViolationKind::MalformedInput,
            Self::TimelockNotExpired { .. }
            | Self::InvalidSignature { .. }
            | Self::WrongUnlockKind { .. }
            | Self::SignatureReused { .. }
            | Self::InvalidUnlockReference { .. }
            | Self::ChainAddressNotUnlocked { .. }
            | Self::SenderNotUnlocked(_) => ViolationKind::UnauthorizedUnlock,
            Self::UnbalancedBaseTokens { .. }
            | Self::StorageDepositReturnUnfulfilled { .. }
            | Self::UnbalancedNativeToken { .. }
            | Self::InputCreatedAfterTransaction { .. }
            | Self::UnbalancedMana { .. } => ViolationKind::UnbalancedValue,
            Self::ChainTransition { .. } => ViolationKind::InvalidChainTransition,
            Self::BlockIssuer { .. } => ViolationKind::InvalidBlockIssuerTransition,
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<SyntaxError> for ValidationError {
    fn from(src: SyntaxError) -> Self {
        Self::Syntax(src)
    }
}

impl From<ManaError> for ValidationError {
    fn from(src: ManaError) -> Self {
        Self::Mana(src)
    }
}

impl From<ArithmeticError> for ValidationError {
    fn from(src: ArithmeticError) -> Self {
        Self::Arithmetic(src)
    }
}

impl From<CodecError> for ValidationError {
    fn from(src: CodecError) -> Self {
        Self::Codec(src)
    }
}

/// A chain output may not move from its current state to the next one.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ChainTransitionError {
    /// A newly created chain output must carry an empty id
    NonEmptyGenesisId,

    /// Immutable features changed
    ImmutableFeaturesChanged,

    /// Governance transition changed the {0}
    GovernanceFieldChanged(&'static str),

    /// State transition changed the {0}
    StateTransitionFieldChanged(&'static str),

    /// State index went from {current} to {next}
    InvalidStateIndex {
        /// Index on the input side.
        current: u32,
        /// Index on the output side.
        next: u32,
    },

    /// Foundry counter decreased from {current} to {next}
    FoundryCounterDecreased {
        /// Counter on the input side.
        current: u32,
        /// Counter on the output side.
        next: u32,
    },

    /// Foundry counter grew by {expected} but {created} foundries were created
    FoundryCountMismatch {
        /// Counter delta.
        expected: u32,
        /// New foundries anchored to the account.
        created: u32,
    },

    /// Metadata feature appeared, disappeared or changed in a state transition
    MetadataFeatureChanged,

    /// Issuer {0} is not unlocked
    IssuerNotUnlocked(Address),

    /// Anchoring account {0} must be both consumed and created
    MissingAnchorAccount(AccountId),

    /// Serial number {serial} is outside [{start}, {end})
    SerialOutOfRange {
        /// Foundry serial number.
        serial: u32,
        /// Foundry counter of the consumed account.
        start: u32,
        /// Foundry counter of the created account.
        end: u32,
    },

    /// Serial number {serial} does not exceed {previous} of an earlier new foundry
    SerialNotIncreasing {
        /// Foundry serial number.
        serial: u32,
        /// Serial number of an earlier new foundry of the same account.
        previous: u32,
    },

    /// Token scheme: {0}
    TokenScheme(TokenSchemeError),
}

impl std::error::Error for ChainTransitionError {}

impl From<TokenSchemeError> for ChainTransitionError {
    fn from(src: TokenSchemeError) -> Self {
        Self::TokenScheme(src)
    }
}

/// A block issuer account broke its credit, expiry or mana rules.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum BlockIssuerError {
    /// No block issuance credit is known for the account
    MissingCredit,

    /// Block issuance credit {0} is negative
    NegativeCredit(BlockIssuanceCredits),

    /// Expiry slot {expiry} is before slot {min_slot}
    ExpiryTooSoon {
        /// Requested expiry slot.
        expiry: SlotIndex,
        /// Earliest allowed expiry slot.
        min_slot: SlotIndex,
    },

    /// The block issuer feature cannot be removed before it expires
    RemovedBeforeExpiry,

    /// The account cannot be destroyed before its block issuer feature expires at slot {0}
    DestroyedBeforeExpiry(SlotIndex),

    /// Mana {account_mana} of the account exceeds the {retained} it keeps
    ManaMovedOffAccount {
        /// Decayed stored plus potential mana on the input side.
        account_mana: Mana,
        /// Mana kept by the account, allotted to it or locked to it.
        retained: Mana,
    },
}

impl std::error::Error for BlockIssuerError {}
