// Copyright (c) 2024 Botho Foundation

//! Fixed-width identifiers.

use crate::{
    constants::{FOUNDRY_ID_LENGTH, HASH_LENGTH, OUTPUT_ID_LENGTH},
    hash::blake2b_256,
};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Defines a 32-byte identifier newtype with hex formatting.
macro_rules! hash_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub [u8; HASH_LENGTH]);

        impl $name {
            /// The all-zero identifier.
            pub const EMPTY: Self = Self([0u8; HASH_LENGTH]);

            /// Derive an identifier by hashing `data`.
            pub fn from_data(data: &[u8]) -> Self {
                Self(blake2b_256(data))
            }

            /// Whether this is the all-zero identifier.
            pub fn is_empty(&self) -> bool {
                self.0 == [0u8; HASH_LENGTH]
            }

            /// The raw bytes.
            pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
                &self.0
            }

            /// Parse from hex, with or without a `0x` prefix.
            pub fn from_hex(value: &str) -> Result<Self, hex::FromHexError> {
                let mut bytes = [0u8; HASH_LENGTH];
                hex::decode_to_slice(value.trim_start_matches("0x"), &mut bytes)?;
                Ok(Self(bytes))
            }
        }

        impl From<[u8; HASH_LENGTH]> for $name {
            fn from(bytes: [u8; HASH_LENGTH]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

hash_id!(
    /// A generic 32-byte hash identifier (commitments, signing messages).
    Identifier
);
hash_id!(
    /// Identifies a transaction: the hash of its encoding.
    TransactionId
);
hash_id!(
    /// Identifies an account chain.
    AccountId
);
hash_id!(
    /// Identifies an NFT chain.
    NftId
);
hash_id!(
    /// Identifies a delegation output.
    DelegationId
);
hash_id!(
    /// Identifies a slot commitment referenced by a context input.
    CommitmentId
);

/// References an output: the transaction that created it and its index
/// within that transaction's outputs.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct OutputId {
    /// The creating transaction.
    pub transaction_id: TransactionId,
    /// Position in the creating transaction's output list.
    pub index: u16,
}

impl OutputId {
    /// Create a new output id.
    pub fn new(transaction_id: TransactionId, index: u16) -> Self {
        Self {
            transaction_id,
            index,
        }
    }

    /// Canonical bytes: transaction id followed by the little-endian index.
    pub fn to_bytes(&self) -> [u8; OUTPUT_ID_LENGTH] {
        let mut bytes = [0u8; OUTPUT_ID_LENGTH];
        bytes[..HASH_LENGTH].copy_from_slice(&self.transaction_id.0);
        bytes[HASH_LENGTH..].copy_from_slice(&self.index.to_le_bytes());
        bytes
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl AccountId {
    /// The id an account receives when the output that created it is first
    /// referenced.
    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self::from_data(&output_id.to_bytes())
    }

    /// `self` if non-empty, otherwise the id derived from `output_id`.
    pub fn or_from_output_id(self, output_id: &OutputId) -> Self {
        if self.is_empty() {
            Self::from_output_id(output_id)
        } else {
            self
        }
    }
}

impl NftId {
    /// The id an NFT receives when the output that created it is first
    /// referenced.
    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self::from_data(&output_id.to_bytes())
    }

    /// `self` if non-empty, otherwise the id derived from `output_id`.
    pub fn or_from_output_id(self, output_id: &OutputId) -> Self {
        if self.is_empty() {
            Self::from_output_id(output_id)
        } else {
            self
        }
    }
}

impl DelegationId {
    /// The id a delegation receives when the output that created it is first
    /// referenced.
    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self::from_data(&output_id.to_bytes())
    }
}

/// Token scheme kind byte embedded in a foundry id.
pub const SIMPLE_TOKEN_SCHEME_KIND: u8 = 0;

/// Account address kind byte embedded in a foundry id.
pub(crate) const ACCOUNT_ADDRESS_KIND: u8 = 8;

/// Identifies a foundry and, equally, the native token it controls.
///
/// Derived from the anchoring account, the serial number and the token
/// scheme kind; none of these may change over the foundry's lifetime.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct FoundryId {
    /// The account controlling the foundry.
    pub account_id: AccountId,
    /// Serial number assigned from the account's foundry counter.
    pub serial_number: u32,
    /// Kind of the foundry's token scheme.
    pub token_scheme_kind: u8,
}

/// Native tokens are identified by the foundry that mints them.
pub type NativeTokenId = FoundryId;

impl FoundryId {
    /// Build a foundry id.
    pub fn new(account_id: AccountId, serial_number: u32, token_scheme_kind: u8) -> Self {
        Self {
            account_id,
            serial_number,
            token_scheme_kind,
        }
    }

    /// Canonical bytes: account address, little-endian serial, scheme kind.
    pub fn to_bytes(&self) -> [u8; FOUNDRY_ID_LENGTH] {
        let mut bytes = [0u8; FOUNDRY_ID_LENGTH];
        bytes[0] = ACCOUNT_ADDRESS_KIND;
        bytes[1..1 + HASH_LENGTH].copy_from_slice(&self.account_id.0);
        bytes[1 + HASH_LENGTH..1 + HASH_LENGTH + 4]
            .copy_from_slice(&self.serial_number.to_le_bytes());
        bytes[FOUNDRY_ID_LENGTH - 1] = self.token_scheme_kind;
        bytes
    }
}

impl fmt::Display for FoundryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}
