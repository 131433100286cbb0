// Copyright (c) 2024 Botho Foundation

//! Blake2b-256 hashing used for identifiers, commitments and signing messages.

use crate::constants::HASH_LENGTH;
use blake2::{digest::consts::U32, Blake2b, Digest};

/// Blake2b with a 256-bit output.
pub type Blake2b256 = Blake2b<U32>;

/// Hash `data` with blake2b-256.
pub fn blake2b_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    Blake2b256::digest(data).into()
}

/// Hash the concatenation of several byte slices without allocating.
pub fn blake2b_256_concat<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> [u8; HASH_LENGTH] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
