// Copyright (c) 2024 Botho Foundation

//! Addresses: who may unlock an output.

use crate::{
    chain::ChainId,
    constants::HASH_LENGTH,
    hash::blake2b_256,
    ids::{AccountId, NftId},
};
use core::fmt;
use serde::{Deserialize, Serialize};

/// An address backed by an Ed25519 key: the hash of the public key.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Ed25519Address(pub [u8; HASH_LENGTH]);

impl Ed25519Address {
    /// The address controlled by `public_key`.
    pub fn from_public_key_bytes(public_key: &[u8; 32]) -> Self {
        Self(blake2b_256(public_key))
    }
}

/// An address controlled by whoever may transition an account.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AccountAddress(pub AccountId);

/// An address controlled by whoever may transition an NFT.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct NftAddress(pub NftId);

/// The kind byte of an address.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum AddressKind {
    /// Ed25519 key hash.
    Ed25519 = 0,
    /// Account chain.
    Account = 8,
    /// NFT chain.
    Nft = 16,
}

/// Any address kind.
///
/// Account and NFT addresses are chain addresses: they are unlocked by
/// consuming the chain output they name, not by a signature.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Address {
    /// Ed25519 key hash.
    Ed25519(Ed25519Address),
    /// Account chain.
    Account(AccountAddress),
    /// NFT chain.
    Nft(NftAddress),
}

impl Address {
    /// The kind of address.
    pub fn kind(&self) -> AddressKind {
        match self {
            Address::Ed25519(_) => AddressKind::Ed25519,
            Address::Account(_) => AddressKind::Account,
            Address::Nft(_) => AddressKind::Nft,
        }
    }

    /// Whether the address names a chain output.
    pub fn is_chain(&self) -> bool {
        self.chain_id().is_some()
    }

    /// The chain named by this address, if any.
    pub fn chain_id(&self) -> Option<ChainId> {
        match self {
            Address::Ed25519(_) => None,
            Address::Account(address) => Some(ChainId::Account(address.0)),
            Address::Nft(address) => Some(ChainId::Nft(address.0)),
        }
    }

    /// Shorthand for an account address.
    pub fn account(account_id: AccountId) -> Self {
        Address::Account(AccountAddress(account_id))
    }

    /// Shorthand for an NFT address.
    pub fn nft(nft_id: NftId) -> Self {
        Address::Nft(NftAddress(nft_id))
    }
}

impl From<Ed25519Address> for Address {
    fn from(address: Ed25519Address) -> Self {
        Address::Ed25519(address)
    }
}

impl From<AccountAddress> for Address {
    fn from(address: AccountAddress) -> Self {
        Address::Account(address)
    }
}

impl From<NftAddress> for Address {
    fn from(address: NftAddress) -> Self {
        Address::Nft(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Address::Ed25519(address) => write!(f, "ed25519:0x{}", hex::encode(address.0)),
            Address::Account(address) => write!(f, "account:{}", address.0),
            Address::Nft(address) => write!(f, "nft:{}", address.0),
        }
    }
}
