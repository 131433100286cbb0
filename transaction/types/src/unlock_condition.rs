// Copyright (c) 2024 Botho Foundation

//! Unlock conditions: who may consume an output, and when.

use crate::{
    address::{AccountAddress, Address},
    amount::{BaseToken, SlotIndex},
    error::SyntaxError,
    ids::AccountId,
};
use serde::{Deserialize, Serialize};

/// Unlock condition kinds, ordered by their kind byte.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum UnlockConditionKind {
    /// [AddressUnlockCondition]
    Address = 0,
    /// [StorageDepositReturnUnlockCondition]
    StorageDepositReturn = 1,
    /// [TimelockUnlockCondition]
    Timelock = 2,
    /// [ExpirationUnlockCondition]
    Expiration = 3,
    /// State controller of an account.
    StateControllerAddress = 4,
    /// Governor of an account.
    GovernorAddress = 5,
    /// Anchoring account of a foundry.
    ImmutableAccountAddress = 6,
}

/// The output is owned by `address`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct AddressUnlockCondition {
    /// Owner.
    pub address: Address,
}

/// Consuming the output requires returning `amount` to `return_address` in
/// a simple transfer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct StorageDepositReturnUnlockCondition {
    /// Receives the returned deposit.
    pub return_address: Address,
    /// Amount to return.
    pub amount: BaseToken,
}

/// The output may not be consumed before `slot_index`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TimelockUnlockCondition {
    /// First slot in which the output may be consumed.
    pub slot_index: SlotIndex,
}

/// From `slot_index` on, `return_address` owns the output instead of the
/// address condition.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ExpirationUnlockCondition {
    /// Owner after expiry.
    pub return_address: Address,
    /// Slot at which ownership passes to the return address.
    pub slot_index: SlotIndex,
}

/// A condition on consuming an output.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum UnlockCondition {
    /// Owner address.
    Address(AddressUnlockCondition),
    /// Storage deposit return.
    StorageDepositReturn(StorageDepositReturnUnlockCondition),
    /// Timelock.
    Timelock(TimelockUnlockCondition),
    /// Expiration.
    Expiration(ExpirationUnlockCondition),
    /// May perform state transitions of an account.
    StateControllerAddress(Address),
    /// May perform governance transitions of an account.
    GovernorAddress(Address),
    /// The account a foundry belongs to.
    ImmutableAccountAddress(AccountAddress),
}

impl UnlockCondition {
    /// The kind of condition.
    pub fn kind(&self) -> UnlockConditionKind {
        match self {
            UnlockCondition::Address(_) => UnlockConditionKind::Address,
            UnlockCondition::StorageDepositReturn(_) => UnlockConditionKind::StorageDepositReturn,
            UnlockCondition::Timelock(_) => UnlockConditionKind::Timelock,
            UnlockCondition::Expiration(_) => UnlockConditionKind::Expiration,
            UnlockCondition::StateControllerAddress(_) => {
                UnlockConditionKind::StateControllerAddress
            }
            UnlockCondition::GovernorAddress(_) => UnlockConditionKind::GovernorAddress,
            UnlockCondition::ImmutableAccountAddress(_) => {
                UnlockConditionKind::ImmutableAccountAddress
            }
        }
    }

    /// Owner shorthand.
    pub fn address(address: impl Into<Address>) -> Self {
        UnlockCondition::Address(AddressUnlockCondition {
            address: address.into(),
        })
    }

    /// Timelock shorthand.
    pub fn timelock(slot_index: SlotIndex) -> Self {
        UnlockCondition::Timelock(TimelockUnlockCondition { slot_index })
    }

    /// Expiration shorthand.
    pub fn expiration(return_address: impl Into<Address>, slot_index: SlotIndex) -> Self {
        UnlockCondition::Expiration(ExpirationUnlockCondition {
            return_address: return_address.into(),
            slot_index,
        })
    }

    /// Storage deposit return shorthand.
    pub fn storage_deposit_return(return_address: impl Into<Address>, amount: BaseToken) -> Self {
        UnlockCondition::StorageDepositReturn(StorageDepositReturnUnlockCondition {
            return_address: return_address.into(),
            amount,
        })
    }

    fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        match self {
            UnlockCondition::Timelock(TimelockUnlockCondition { slot_index: 0 }) => {
                Err(SyntaxError::ZeroSlot(UnlockConditionKind::Timelock))
            }
            UnlockCondition::Expiration(ExpirationUnlockCondition { slot_index: 0, .. }) => {
                Err(SyntaxError::ZeroSlot(UnlockConditionKind::Expiration))
            }
            _ => Ok(()),
        }
    }
}

/// The unlock conditions of an output, unique by kind and sorted by kind.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<UnlockCondition>", into = "Vec<UnlockCondition>")]
pub struct UnlockConditions(Vec<UnlockCondition>);

impl UnlockConditions {
    /// Sort by kind and reject duplicate kinds or invalid conditions.
    pub fn from_vec(mut conditions: Vec<UnlockCondition>) -> Result<Self, SyntaxError> {
        conditions.sort_by_key(UnlockCondition::kind);
        for pair in conditions.windows(2) {
            if pair[0].kind() == pair[1].kind() {
                return Err(SyntaxError::DuplicateUnlockCondition(pair[0].kind()));
            }
        }
        for condition in &conditions {
            condition.syntactic_validate()?;
        }
        Ok(Self(conditions))
    }

    /// The condition of `kind`, if present.
    pub fn get(&self, kind: UnlockConditionKind) -> Option<&UnlockCondition> {
        self.0
            .binary_search_by_key(&kind, UnlockCondition::kind)
            .ok()
            .map(|index| &self.0[index])
    }

    /// Iterate in kind order.
    pub fn iter(&self) -> core::slice::Iter<'_, UnlockCondition> {
        self.0.iter()
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject any condition whose kind is not in `allowed`.
    pub fn check_allowed(
        &self,
        allowed: &[UnlockConditionKind],
    ) -> Result<(), UnlockConditionKind> {
        match self.0.iter().find(|condition| !allowed.contains(&condition.kind())) {
            Some(condition) => Err(condition.kind()),
            None => Ok(()),
        }
    }

    /// Owner address.
    pub fn address(&self) -> Option<&Address> {
        match self.get(UnlockConditionKind::Address) {
            Some(UnlockCondition::Address(condition)) => Some(&condition.address),
            _ => None,
        }
    }

    /// Storage deposit return condition.
    pub fn storage_deposit_return(&self) -> Option<&StorageDepositReturnUnlockCondition> {
        match self.get(UnlockConditionKind::StorageDepositReturn) {
            Some(UnlockCondition::StorageDepositReturn(condition)) => Some(condition),
            _ => None,
        }
    }

    /// Timelock condition.
    pub fn timelock(&self) -> Option<&TimelockUnlockCondition> {
        match self.get(UnlockConditionKind::Timelock) {
            Some(UnlockCondition::Timelock(condition)) => Some(condition),
            _ => None,
        }
    }

    /// Expiration condition.
    pub fn expiration(&self) -> Option<&ExpirationUnlockCondition> {
        match self.get(UnlockConditionKind::Expiration) {
            Some(UnlockCondition::Expiration(condition)) => Some(condition),
            _ => None,
        }
    }

    /// State controller address.
    pub fn state_controller_address(&self) -> Option<&Address> {
        match self.get(UnlockConditionKind::StateControllerAddress) {
            Some(UnlockCondition::StateControllerAddress(address)) => Some(address),
            _ => None,
        }
    }

    /// Governor address.
    pub fn governor_address(&self) -> Option<&Address> {
        match self.get(UnlockConditionKind::GovernorAddress) {
            Some(UnlockCondition::GovernorAddress(address)) => Some(address),
            _ => None,
        }
    }

    /// Anchoring account address.
    pub fn immutable_account_address(&self) -> Option<&AccountAddress> {
        match self.get(UnlockConditionKind::ImmutableAccountAddress) {
            Some(UnlockCondition::ImmutableAccountAddress(address)) => Some(address),
            _ => None,
        }
    }

    /// Whether the timelock, if any, has passed at `slot`. Returns the
    /// blocking timelock slot otherwise.
    pub fn timelock_expired(&self, slot: SlotIndex) -> Result<(), SlotIndex> {
        match self.timelock() {
            Some(timelock) if slot < timelock.slot_index => Err(timelock.slot_index),
            _ => Ok(()),
        }
    }

    /// The address owning the output at `slot`: the expiration return address
    /// once expired, the address condition otherwise.
    pub fn owner_at(&self, slot: SlotIndex) -> Option<&Address> {
        match self.expiration() {
            Some(expiration) if slot >= expiration.slot_index => Some(&expiration.return_address),
            _ => self.address(),
        }
    }

    /// Whether the output is locked to `account_id` until at least
    /// `min_slot`: owned by the account's address, not expiring elsewhere,
    /// and timelocked to a slot no earlier than `min_slot`.
    pub fn is_mana_locked_to(&self, account_id: &AccountId, min_slot: SlotIndex) -> bool {
        if self.address() != Some(&Address::account(*account_id)) || self.expiration().is_some() {
            return false;
        }
        matches!(self.timelock(), Some(timelock) if timelock.slot_index >= min_slot)
    }
}

impl TryFrom<Vec<UnlockCondition>> for UnlockConditions {
    type Error = SyntaxError;

    fn try_from(conditions: Vec<UnlockCondition>) -> Result<Self, Self::Error> {
        Self::from_vec(conditions)
    }
}

impl From<UnlockConditions> for Vec<UnlockCondition> {
    fn from(conditions: UnlockConditions) -> Self {
        conditions.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Ed25519Address;
    use assert_matches::assert_matches;

    fn alice() -> Address {
        Address::Ed25519(Ed25519Address([1u8; 32]))
    }

    fn bob() -> Address {
        Address::Ed25519(Ed25519Address([2u8; 32]))
    }

    #[test]
    fn test_unique_by_kind() {
        assert_matches!(
            UnlockConditions::from_vec(vec![UnlockCondition::address(alice()), UnlockCondition::address(bob())]),
            Err(SyntaxError::DuplicateUnlockCondition(UnlockConditionKind::Address))
        );
        assert_matches!(
            UnlockConditions::from_vec(vec![UnlockCondition::timelock(0)]),
            Err(SyntaxError::ZeroSlot(UnlockConditionKind::Timelock))
        );
    }

    #[test]
    fn test_timelock() {
        let conditions =
            UnlockConditions::from_vec(vec![UnlockCondition::timelock(10), UnlockCondition::address(alice())])
                .unwrap();
        assert_eq!(conditions.iter().next().map(UnlockCondition::kind), Some(UnlockConditionKind::Address));
        assert_eq!(conditions.timelock_expired(9), Err(10));
        assert_eq!(conditions.timelock_expired(10), Ok(()));
    }

    #[test]
    fn test_expiration_switches_owner() {
        let conditions = UnlockConditions::from_vec(vec![
            UnlockCondition::address(alice()),
            UnlockCondition::expiration(bob(), 20),
        ])
        .unwrap();
        assert_eq!(conditions.owner_at(19), Some(&alice()));
        assert_eq!(conditions.owner_at(20), Some(&bob()));
    }

    #[test]
    fn test_mana_lock_boundary() {
        let account_id = AccountId([5u8; 32]);
        let locked = UnlockConditions::from_vec(vec![
            UnlockCondition::address(Address::account(account_id)),
            UnlockCondition::timelock(110),
        ])
        .unwrap();
        // Lock ending exactly at the threshold still counts.
        assert!(locked.is_mana_locked_to(&account_id, 110));
        assert!(!locked.is_mana_locked_to(&account_id, 111));
        assert!(!locked.is_mana_locked_to(&AccountId([6u8; 32]), 100));

        let unlocked =
            UnlockConditions::from_vec(vec![UnlockCondition::address(Address::account(account_id))]).unwrap();
        assert!(!unlocked.is_mana_locked_to(&account_id, 0));
    }
}
