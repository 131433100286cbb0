// Copyright (c) 2024 Botho Foundation

use nova_transaction_types::{
    amount::safe_sum, constants::MAX_ALLOTMENTS, AccountId, ArithmeticError, Mana, SyntaxError,
};
use serde::{Deserialize, Serialize};

/// Mana moved directly into an account's block issuance credit.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Allotment {
    /// Receiving account.
    pub account_id: AccountId,
    /// Mana allotted.
    pub mana: Mana,
}

impl Allotment {
    /// Allot `mana` to `account_id`.
    pub fn new(account_id: AccountId, mana: Mana) -> Self {
        Self { account_id, mana }
    }
}

/// Allotments of a transaction, sorted by account id and unique per account.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Allotment>", into = "Vec<Allotment>")]
pub struct Allotments(Vec<Allotment>);

impl Allotments {
    /// Sort `allotments` and check their count and uniqueness.
    pub fn from_vec(mut allotments: Vec<Allotment>) -> Result<Self, SyntaxError> {
        if allotments.len() > MAX_ALLOTMENTS {
            return Err(SyntaxError::TooManyAllotments(allotments.len()));
        }
        allotments.sort_by_key(|allotment| allotment.account_id);
        for pair in allotments.windows(2) {
            if pair[0].account_id == pair[1].account_id {
                return Err(SyntaxError::DuplicateAllotment(pair[0].account_id));
            }
        }
        Ok(Self(allotments))
    }

    /// Mana allotted to `account_id`, zero if none.
    pub fn get(&self, account_id: &AccountId) -> Mana {
        self.0
            .binary_search_by_key(account_id, |allotment| allotment.account_id)
            .map(|index| self.0[index].mana)
            .unwrap_or_default()
    }

    /// Sum of all allotted mana.
    pub fn total(&self) -> Result<Mana, ArithmeticError> {
        safe_sum(self.0.iter().map(|allotment| allotment.mana), "allotted mana")
    }

    /// Iterate in account id order.
    pub fn iter(&self) -> core::slice::Iter<'_, Allotment> {
        self.0.iter()
    }

    /// Number of allotments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no allotments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Allotment>> for Allotments {
    type Error = SyntaxError;

    fn try_from(allotments: Vec<Allotment>) -> Result<Self, Self::Error> {
        Self::from_vec(allotments)
    }
}

impl From<Allotments> for Vec<Allotment> {
    fn from(allotments: Allotments) -> Self {
        allotments.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_sorted_and_summed() {
        let allotments = Allotments::from_vec(vec![
            Allotment::new(AccountId([2u8; 32]), 5),
            Allotment::new(AccountId([1u8; 32]), 7),
        ])
        .unwrap();
        assert_eq!(allotments.iter().next().unwrap().account_id, AccountId([1u8; 32]));
        assert_eq!(allotments.get(&AccountId([2u8; 32])), 5);
        assert_eq!(allotments.get(&AccountId([3u8; 32])), 0);
        assert_eq!(allotments.total(), Ok(12));
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let result = Allotments::from_vec(vec![
            Allotment::new(AccountId([1u8; 32]), 5),
            Allotment::new(AccountId([1u8; 32]), 7),
        ]);
        assert_matches!(result, Err(SyntaxError::DuplicateAllotment(_)));
    }

    #[test]
    fn test_total_overflow() {
        let allotments = Allotments::from_vec(vec![
            Allotment::new(AccountId([1u8; 32]), u64::MAX),
            Allotment::new(AccountId([2u8; 32]), 1),
        ])
        .unwrap();
        assert!(allotments.total().is_err());
    }
}
