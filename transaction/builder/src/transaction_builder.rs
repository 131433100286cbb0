// Copyright (c) 2024 Botho Foundation

//! Utility for constructing a transaction.
//!
//! Inputs keep the order they were added in. That order is hashed into the
//! inputs commitment and fixes the positions referential unlocks point at.

use crate::error::TxBuilderError;
use nova_transaction_core::{
    inputs_commitment, Allotment, Allotments, AddressSigner, ContextInput, Payload,
    TaggedDataPayload, Transaction, TransactionEssence, Unlock, Unlocks,
};
use nova_transaction_types::{
    constants::{MAX_INPUTS, MAX_OUTPUTS},
    AccountId, Address, Mana, Output, OutputId, ProtocolParameters, SlotIndex,
};
use std::collections::BTreeMap;
use tracing::debug;

/// An input together with what is needed to unlock it.
#[derive(Clone, Debug)]
struct InputEntry {
    output_id: OutputId,
    owner: Address,
    output: Output,
}

/// Helper utility for building and signing a transaction.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    /// Network the transaction is meant for.
    network_id: u64,

    /// Slot the transaction claims to be created in.
    creation_slot: SlotIndex,

    /// Read-only context inputs.
    context_inputs: Vec<ContextInput>,

    /// Consumed outputs, in essence order.
    inputs: Vec<InputEntry>,

    /// Created outputs.
    outputs: Vec<Output>,

    /// Mana allotted to accounts.
    allotments: Vec<Allotment>,

    /// Optional inner payload.
    payload: Option<Payload>,

    /// Parameters the outputs are checked against.
    params: Option<ProtocolParameters>,

    /// The first rejection recorded by an earlier call.
    error: Option<TxBuilderError>,
}

impl TransactionBuilder {
    /// Initializes an empty transaction builder.
    ///
    /// # Arguments
    /// * `network_id` - The network the transaction is meant for.
    pub fn new(network_id: u64) -> Self {
        Self {
            network_id,
            creation_slot: 0,
            context_inputs: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            allotments: Vec::new(),
            payload: None,
            params: None,
            error: None,
        }
    }

    /// Add an input to the transaction.
    ///
    /// # Arguments
    /// * `output_id` - The consumed output's id.
    /// * `owner` - The address that must unlock the output in this
    ///   transaction.
    /// * `output` - The consumed output, needed for the inputs commitment.
    pub fn add_input(
        &mut self,
        output_id: OutputId,
        owner: Address,
        output: impl Into<Output>,
    ) -> &mut Self {
        if self.inputs.iter().any(|input| input.output_id == output_id) {
            self.reject(TxBuilderError::DuplicateInput(output_id));
        } else if self.inputs.len() >= MAX_INPUTS {
            self.reject(TxBuilderError::TooManyInputs(MAX_INPUTS));
        } else {
            self.inputs.push(InputEntry {
                output_id,
                owner,
                output: output.into(),
            });
        }
        self
    }

    /// Add a context input.
    pub fn add_context_input(&mut self, context_input: ContextInput) -> &mut Self {
        self.context_inputs.push(context_input);
        self
    }

    /// Add an output to the transaction.
    ///
    /// The output is checked against the protocol parameters right away if
    /// they are known, and again when the transaction is built.
    pub fn add_output(&mut self, output: impl Into<Output>) -> &mut Self {
        let output = output.into();
        if self.outputs.len() >= MAX_OUTPUTS {
            self.reject(TxBuilderError::TooManyOutputs(MAX_OUTPUTS));
            return self;
        }
        if let Some(params) = &self.params {
            if let Err(err) = output.syntactic_validate(params) {
                self.reject(err.into());
                return self;
            }
        }
        self.outputs.push(output);
        self
    }

    /// Allot `mana` to the block issuance credit of `account_id`.
    pub fn add_allotment(&mut self, account_id: AccountId, mana: Mana) -> &mut Self {
        self.allotments.push(Allotment::new(account_id, mana));
        self
    }

    /// Set the slot the transaction is created in.
    pub fn set_creation_slot(&mut self, creation_slot: SlotIndex) -> &mut Self {
        self.creation_slot = creation_slot;
        self
    }

    /// Attach a tagged data payload.
    pub fn add_tagged_data_payload(
        &mut self,
        tag: impl Into<Vec<u8>>,
        data: impl Into<Vec<u8>>,
    ) -> &mut Self {
        match TaggedDataPayload::new(tag, data) {
            Ok(payload) => self.payload = Some(payload.into()),
            Err(err) => self.reject(err.into()),
        }
        self
    }

    /// Set the protocol parameters outputs are checked against.
    pub fn set_protocol_parameters(&mut self, params: ProtocolParameters) -> &mut Self {
        self.params = Some(params);
        self
    }

    /// Number of inputs added so far.
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs added so far.
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Consume the builder and return the signed transaction.
    ///
    /// # Arguments
    /// * `signer` - Produces a signature for each distinct Ed25519 owner.
    pub fn build(self, signer: Option<&dyn AddressSigner>) -> Result<Transaction, TxBuilderError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let params = self
            .params
            .ok_or(TxBuilderError::MissingProtocolParameters)?;
        let signer = signer.ok_or(TxBuilderError::MissingSigner)?;
        if self.network_id != params.network_id() {
            return Err(TxBuilderError::NetworkIdMismatch {
                expected: params.network_id(),
                actual: self.network_id,
            });
        }
        if self.inputs.is_empty() {
            return Err(TxBuilderError::NoInputs);
        }

        let essence = TransactionEssence {
            network_id: self.network_id,
            creation_slot: self.creation_slot,
            context_inputs: self.context_inputs,
            inputs: self.inputs.iter().map(|input| input.output_id).collect(),
            inputs_commitment: inputs_commitment(self.inputs.iter().map(|input| &input.output))?,
            outputs: self.outputs,
            allotments: Allotments::from_vec(self.allotments)?,
            payload: self.payload,
        };
        let message = essence.signing_message()?;
        let unlocks = assign_unlocks(&self.inputs, &message, signer)?;

        let tx = Transaction {
            essence,
            unlocks: Unlocks::from_vec(unlocks)?,
        };
        tx.syntactic_validate(&params)?;
        debug!(
            inputs = tx.essence.inputs.len(),
            outputs = tx.essence.outputs.len(),
            signatures = tx.unlocks.signature_count(),
            "built transaction"
        );
        Ok(tx)
    }

    fn reject(&mut self, err: TxBuilderError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// One unlock per input, in input order.
///
/// The first input owned by an Ed25519 address gets a signature, later ones
/// reference it. Inputs owned by a chain address reference the input that
/// consumed that chain.
fn assign_unlocks(
    inputs: &[InputEntry],
    message: &[u8],
    signer: &dyn AddressSigner,
) -> Result<Vec<Unlock>, TxBuilderError> {
    let mut unlocked: BTreeMap<Address, usize> = BTreeMap::new();
    let mut unlocks = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.iter().enumerate() {
        let unlock = match unlocked.get(&input.owner) {
            Some(&first) => {
                let reference =
                    u16::try_from(first).map_err(|_| TxBuilderError::ReferenceOutOfRange(first))?;
                match input.owner {
                    Address::Ed25519(_) => Unlock::Reference(reference),
                    Address::Account(_) => Unlock::Account(reference),
                    Address::Nft(_) => Unlock::Nft(reference),
                }
            }
            None if input.owner.is_chain() => {
                return Err(TxBuilderError::ChainNotUnlocked {
                    index,
                    address: input.owner,
                })
            }
            None => {
                unlocked.insert(input.owner, index);
                Unlock::Signature(signer.sign(&input.owner, message)?)
            }
        };
        unlocks.push(unlock);

        if let Some(address) = input
            .output
            .resolved_chain_id(&input.output_id)
            .and_then(|chain_id| chain_id.to_address())
        {
            unlocked.insert(address, index);
        }
    }
    Ok(unlocks)
}
