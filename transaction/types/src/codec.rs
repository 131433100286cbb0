// Copyright (c) 2024 Botho Foundation

//! Canonical binary encoding and JSON conversion of ledger records.
//!
//! Binary encoding is bincode with fixed-width little-endian integers. Field
//! order follows declaration order and trailing bytes are rejected, so every
//! record has exactly one encoding.

use crate::{constants::HASH_LENGTH, error::CodecError, hash::blake2b_256};
use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Encode `value` to its canonical bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    options()
        .serialize(value)
        .map_err(|err| CodecError::Encode(err.to_string()))
}

/// Decode a record from canonical bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    options()
        .deserialize(bytes)
        .map_err(|err| CodecError::Decode(err.to_string()))
}

/// Length of the canonical encoding of `value`.
pub fn encoded_len<T: Serialize + ?Sized>(value: &T) -> Result<u64, CodecError> {
    options()
        .serialized_size(value)
        .map_err(|err| CodecError::Encode(err.to_string()))
}

/// Blake2b-256 of the canonical encoding of `value`.
pub fn hash<T: Serialize + ?Sized>(value: &T) -> Result<[u8; HASH_LENGTH], CodecError> {
    Ok(blake2b_256(&encode(value)?))
}

/// Serialize `value` as JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(|err| CodecError::Json(err.to_string()))
}

/// Deserialize a record from JSON.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, CodecError> {
    serde_json::from_str(json).map_err(|err| CodecError::Json(err.to_string()))
}
