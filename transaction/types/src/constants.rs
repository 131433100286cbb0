// Copyright (c) 2024 Botho Foundation

//! Ledger-wide limits and fixed lengths.

/// Length in bytes of every hash-derived identifier.
pub const HASH_LENGTH: usize = 32;

/// Length in bytes of an output id: transaction id followed by a u16 index.
pub const OUTPUT_ID_LENGTH: usize = HASH_LENGTH + 2;

/// Length in bytes of a foundry id: account address, serial number and token
/// scheme kind.
pub const FOUNDRY_ID_LENGTH: usize = 1 + HASH_LENGTH + 4 + 1;

/// A transaction must contain at least one and no more than this many inputs.
pub const MAX_INPUTS: usize = 128;

/// A transaction must contain at least one and no more than this many outputs.
pub const MAX_OUTPUTS: usize = 128;

/// A transaction must contain no more than this many context inputs.
pub const MAX_CONTEXT_INPUTS: usize = 128;

/// A transaction must contain no more than this many allotments.
pub const MAX_ALLOTMENTS: usize = 128;

/// Maximum number of native tokens a single output may hold.
pub const MAX_NATIVE_TOKENS_PER_OUTPUT: usize = 64;

/// Maximum number of distinct native tokens across a transaction's inputs and
/// outputs.
pub const MAX_NATIVE_TOKENS_PER_TRANSACTION: usize = 64;

/// Maximum length of a tag, both as a feature and as a tagged data payload tag.
pub const MAX_TAG_LENGTH: usize = 64;

/// Maximum serialized size of a metadata feature's entries.
pub const MAX_METADATA_LENGTH: usize = 8192;

/// Maximum length of tagged data payload data.
pub const MAX_TAGGED_DATA_LENGTH: usize = 8192;

/// Minimum number of keys in a block issuer feature.
pub const MIN_BLOCK_ISSUER_KEYS: usize = 1;

/// Maximum number of keys in a block issuer feature.
pub const MAX_BLOCK_ISSUER_KEYS: usize = 128;

/// Storage score offset charged for the output id of every output, in
/// key-factor units.
pub const OUTPUT_ID_OFFSET_BYTES: u64 = OUTPUT_ID_LENGTH as u64;

/// Storage score offset charged for the block id and slot of every output, in
/// data-factor units.
pub const OUTPUT_METADATA_OFFSET_BYTES: u64 = (HASH_LENGTH + 8) as u64;
