// Copyright (c) 2024 Botho Foundation

use nova_transaction_types::{
    constants::{MAX_TAGGED_DATA_LENGTH, MAX_TAG_LENGTH},
    SyntaxError,
};
use serde::{Deserialize, Serialize};

/// Arbitrary tagged bytes carried by a transaction.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TaggedDataPayload {
    /// Indexation tag, at most 64 bytes.
    pub tag: Vec<u8>,
    /// Data, at most 8192 bytes.
    pub data: Vec<u8>,
}

impl TaggedDataPayload {
    /// Create a payload, checking the tag and data lengths.
    pub fn new(tag: impl Into<Vec<u8>>, data: impl Into<Vec<u8>>) -> Result<Self, SyntaxError> {
        let payload = Self {
            tag: tag.into(),
            data: data.into(),
        };
        payload.syntactic_validate()?;
        Ok(payload)
    }

    /// Check the tag and data lengths.
    pub fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        if self.tag.len() > MAX_TAG_LENGTH {
            return Err(SyntaxError::InvalidTaggedData("tag too long"));
        }
        if self.data.len() > MAX_TAGGED_DATA_LENGTH {
            return Err(SyntaxError::InvalidTaggedData("data too long"));
        }
        Ok(())
    }
}

/// Inner payload of a transaction.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// [TaggedDataPayload]
    TaggedData(TaggedDataPayload),
}

impl Payload {
    /// Check the payload's structure.
    pub fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        match self {
            Payload::TaggedData(payload) => payload.syntactic_validate(),
        }
    }

    /// Bytes counted against the data work score.
    pub fn data_len(&self) -> usize {
        match self {
            Payload::TaggedData(payload) => payload.tag.len() + payload.data.len(),
        }
    }
}

impl From<TaggedDataPayload> for Payload {
    fn from(payload: TaggedDataPayload) -> Self {
        Payload::TaggedData(payload)
    }
}
