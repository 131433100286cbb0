// Copyright (c) 2024 Botho Foundation

//! Chain identities and transition kinds.

use crate::{
    address::Address,
    ids::{AccountId, FoundryId, NftId, OutputId},
};
use core::fmt;
use serde::{Deserialize, Serialize};

/// The persistent identity of a chain output.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum ChainId {
    /// An account.
    Account(AccountId),
    /// A foundry.
    Foundry(FoundryId),
    /// An NFT.
    Nft(NftId),
}

impl ChainId {
    /// Whether this is the all-zero placeholder of a chain being created.
    /// Foundry ids are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            ChainId::Account(id) => id.is_empty(),
            ChainId::Foundry(_) => false,
            ChainId::Nft(id) => id.is_empty(),
        }
    }

    /// Replace an empty placeholder with the id derived from `output_id`.
    pub fn or_from_output_id(self, output_id: &OutputId) -> Self {
        match self {
            ChainId::Account(id) => ChainId::Account(id.or_from_output_id(output_id)),
            ChainId::Foundry(id) => ChainId::Foundry(id),
            ChainId::Nft(id) => ChainId::Nft(id.or_from_output_id(output_id)),
        }
    }

    /// The address unlocked by consuming this chain, if the chain is
    /// addressable.
    pub fn to_address(&self) -> Option<Address> {
        match self {
            ChainId::Account(id) => Some(Address::account(*id)),
            ChainId::Foundry(_) => None,
            ChainId::Nft(id) => Some(Address::nft(*id)),
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainId::Account(id) => write!(f, "account {id}"),
            ChainId::Foundry(id) => write!(f, "foundry {id}"),
            ChainId::Nft(id) => write!(f, "nft {id}"),
        }
    }
}

/// How a chain output is affected by a transaction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChainTransitionType {
    /// The chain is created.
    Genesis,
    /// The chain is consumed and re-created.
    StateChange,
    /// The chain is consumed and not re-created.
    Destroy,
}

impl fmt::Display for ChainTransitionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ChainTransitionType::Genesis => "genesis",
            ChainTransitionType::StateChange => "state change",
            ChainTransitionType::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{TransactionId, SIMPLE_TOKEN_SCHEME_KIND};

    #[test]
    fn test_empty_chain_ids_resolve() {
        let output_id = OutputId::new(TransactionId([4u8; 32]), 1);
        let resolved = ChainId::Account(AccountId::EMPTY).or_from_output_id(&output_id);
        assert_eq!(resolved, ChainId::Account(AccountId::from_output_id(&output_id)));
        assert!(!resolved.is_empty());

        let foundry = ChainId::Foundry(FoundryId::new(AccountId::EMPTY, 0, SIMPLE_TOKEN_SCHEME_KIND));
        assert!(!foundry.is_empty());
        assert_eq!(foundry.or_from_output_id(&output_id), foundry);
        assert_eq!(foundry.to_address(), None);
    }
}
