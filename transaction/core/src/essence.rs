// Copyright (c) 2024 Botho Foundation

use crate::{allotment::Allotments, context_input::ContextInput, payload::Payload};
use nova_transaction_types::{
    codec, constants::HASH_LENGTH, hash::blake2b_256_concat, CodecError, Identifier, Output,
    OutputId, SlotIndex,
};
use serde::{Deserialize, Serialize};

/// The signed part of a transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionEssence {
    /// Network the transaction is meant for.
    pub network_id: u64,
    /// Slot the transaction claims to be created in.
    pub creation_slot: SlotIndex,
    /// Read-only references.
    pub context_inputs: Vec<ContextInput>,
    /// Consumed outputs. The order is hashed into the commitment and fixes
    /// the positions referential unlocks point at.
    pub inputs: Vec<OutputId>,
    /// Commitment over the consumed outputs, see [inputs_commitment].
    pub inputs_commitment: Identifier,
    /// Created outputs.
    pub outputs: Vec<Output>,
    /// Mana moved into accounts' block issuance credit.
    pub allotments: Allotments,
    /// Optional inner payload.
    pub payload: Option<Payload>,
}

impl TransactionEssence {
    /// The message every signature unlock signs.
    pub fn signing_message(&self) -> Result<[u8; HASH_LENGTH], CodecError> {
        codec::hash(self)
    }
}

/// Hash over the concatenated hashes of the consumed outputs, in input
/// order.
pub fn inputs_commitment<'a>(
    outputs: impl IntoIterator<Item = &'a Output>,
) -> Result<Identifier, CodecError> {
    let hashes = outputs
        .into_iter()
        .map(codec::hash)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Identifier(blake2b_256_concat(
        hashes.iter().map(|hash| hash.as_slice()),
    )))
}
