// Copyright (c) 2024 Botho Foundation

//! Amount and time value types, and overflow-checked arithmetic over them.

use displaydoc::Display;

/// Base token units.
pub type BaseToken = u64;

/// Mana units.
pub type Mana = u64;

/// Index of a slot since genesis.
pub type SlotIndex = u64;

/// Index of an epoch since genesis.
pub type EpochIndex = u64;

/// Block issuance credits held by an account. May be negative.
pub type BlockIssuanceCredits = i64;

/// An arithmetic operation left the range of its value type.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ArithmeticError {
    /// Overflow while computing {0}
    Overflow(&'static str),

    /// Underflow while computing {0}
    Underflow(&'static str),
}

impl std::error::Error for ArithmeticError {}

/// `a + b`, naming `what` on overflow.
pub fn safe_add(a: u64, b: u64, what: &'static str) -> Result<u64, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow(what))
}

/// `a - b`, naming `what` on underflow.
pub fn safe_sub(a: u64, b: u64, what: &'static str) -> Result<u64, ArithmeticError> {
    a.checked_sub(b).ok_or(ArithmeticError::Underflow(what))
}

/// `a * b`, naming `what` on overflow.
pub fn safe_mul(a: u64, b: u64, what: &'static str) -> Result<u64, ArithmeticError> {
    a.checked_mul(b).ok_or(ArithmeticError::Overflow(what))
}

/// Sum an iterator of values, failing on overflow.
pub fn safe_sum(
    values: impl IntoIterator<Item = u64>,
    what: &'static str,
) -> Result<u64, ArithmeticError> {
    values
        .into_iter()
        .try_fold(0u64, |acc, value| safe_add(acc, value, what))
}
