// Copyright (c) 2024 Botho Foundation

//! Nova transactions: the essence, unlocks and signatures, and the
//! validation pipeline deciding whether a transaction may move the ledger
//! from one state to the next.

#![deny(missing_docs)]

mod allotment;
mod context_input;
mod essence;
mod payload;
mod signature;
mod tx;
mod unlock;

pub mod validation;

pub use allotment::{Allotment, Allotments};
pub use context_input::ContextInput;
pub use essence::{inputs_commitment, TransactionEssence};
pub use payload::{Payload, TaggedDataPayload};
pub use signature::{AddressSigner, Ed25519Signature, SignatureError, SignerError};
pub use tx::Transaction;
pub use unlock::{Unlock, Unlocks};
pub use validation::{
    validate, BlockIssuanceCreditMap, BlockIssuerError, ChainTransitionError, Check,
    OutputWithCreationSlot, ResolvedInputs, ValidationError, ValidationResult, ViolationKind, Vm,
};

// Re-export the ledger types this crate's API is written against.
pub use nova_transaction_types::{
    self as types, codec, constants, AccountId, Address, Identifier, Output, OutputId,
    ProtocolParameters, SlotIndex, TransactionId,
};
