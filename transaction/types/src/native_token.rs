// Copyright (c) 2024 Botho Foundation

//! Native tokens held by outputs.

use crate::{
    amount::ArithmeticError,
    constants::MAX_NATIVE_TOKENS_PER_OUTPUT,
    error::SyntaxError,
    ids::NativeTokenId,
};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An amount of one native token.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct NativeToken {
    /// The token, i.e. the foundry that controls its supply.
    pub id: NativeTokenId,
    /// Quantity held. Never zero.
    pub amount: U256,
}

impl NativeToken {
    /// Create a native token amount.
    pub fn new(id: NativeTokenId, amount: impl Into<U256>) -> Self {
        Self {
            id,
            amount: amount.into(),
        }
    }
}

/// The native tokens of one output, sorted by id and unique.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NativeToken>", into = "Vec<NativeToken>")]
pub struct NativeTokens(Vec<NativeToken>);

impl NativeTokens {
    /// An empty list.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Sort `tokens` and check count, uniqueness and amounts.
    pub fn from_vec(mut tokens: Vec<NativeToken>) -> Result<Self, SyntaxError> {
        if tokens.len() > MAX_NATIVE_TOKENS_PER_OUTPUT {
            return Err(SyntaxError::TooManyNativeTokens(tokens.len()));
        }
        tokens.sort_by_key(|token| token.id);
        for pair in tokens.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(SyntaxError::DuplicateNativeToken(pair[0].id));
            }
        }
        if let Some(token) = tokens.iter().find(|token| token.amount.is_zero()) {
            return Err(SyntaxError::ZeroNativeTokenAmount(token.id));
        }
        Ok(Self(tokens))
    }

    /// Iterate in id order.
    pub fn iter(&self) -> core::slice::Iter<'_, NativeToken> {
        self.0.iter()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The amount held of `id`, if any.
    pub fn get(&self, id: &NativeTokenId) -> Option<&U256> {
        self.0
            .binary_search_by(|token| token.id.cmp(id))
            .ok()
            .map(|index| &self.0[index].amount)
    }
}

impl TryFrom<Vec<NativeToken>> for NativeTokens {
    type Error = SyntaxError;

    fn try_from(tokens: Vec<NativeToken>) -> Result<Self, Self::Error> {
        Self::from_vec(tokens)
    }
}

impl From<NativeTokens> for Vec<NativeToken> {
    fn from(tokens: NativeTokens) -> Self {
        tokens.0
    }
}

impl<'a> IntoIterator for &'a NativeTokens {
    type Item = &'a NativeToken;
    type IntoIter = core::slice::Iter<'a, NativeToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Aggregated native token amounts per token id.
pub type NativeTokenSum = BTreeMap<NativeTokenId, U256>;

/// Add `token` into `sum`.
pub fn accumulate_native_token(
    sum: &mut NativeTokenSum,
    token: &NativeToken,
) -> Result<(), ArithmeticError> {
    let entry = sum.entry(token.id).or_insert_with(U256::zero);
    *entry = entry
        .checked_add(token.amount)
        .ok_or(ArithmeticError::Overflow("native token sum"))?;
    Ok(())
}
