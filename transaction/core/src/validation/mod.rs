// Copyright (c) 2024 Botho Foundation

//! Validation routines for a Nova transaction.

mod chain;
mod error;
mod unlock;
mod validate;
mod working_set;

pub use self::{
    chain::validate_chain_transitions,
    error::{
        BlockIssuerError, ChainTransitionError, ValidationError, ValidationResult, ViolationKind,
    },
    unlock::validate_input_unlocks,
    validate::{
        validate, validate_balanced_base_tokens, validate_balanced_mana,
        validate_balanced_native_tokens, validate_senders_unlocked, validate_timelocks, Check, Vm,
    },
    working_set::{
        BlockIssuanceCreditMap, OutputWithCreationSlot, ResolvedInput, ResolvedInputs,
        UnlockedAddress, WorkingSet,
    },
};
