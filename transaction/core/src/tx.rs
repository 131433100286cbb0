// Copyright (c) 2024 Botho Foundation

//! A transaction: the essence plus one unlock per input.

use crate::{essence::TransactionEssence, unlock::Unlocks};
use nova_transaction_types::{
    amount::safe_add,
    codec,
    constants::{MAX_CONTEXT_INPUTS, MAX_INPUTS, MAX_OUTPUTS},
    ArithmeticError, CodecError, OutputId, ProtocolParameters, SyntaxError, TransactionId,
    WorkScore, WorkScoreStructure,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A signed transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The signed content.
    pub essence: TransactionEssence,
    /// Proofs authorizing the consumption of each input.
    pub unlocks: Unlocks,
}

impl Transaction {
    /// Hash of the canonical encoding of the whole transaction.
    pub fn id(&self) -> Result<TransactionId, CodecError> {
        Ok(TransactionId(codec::hash(self)?))
    }

    /// Id of the output created at `index`.
    pub fn output_id(&self, index: u16) -> Result<OutputId, CodecError> {
        Ok(OutputId::new(self.id()?, index))
    }

    /// Check the transaction's structure against the protocol parameters.
    pub fn syntactic_validate(&self, params: &ProtocolParameters) -> Result<(), SyntaxError> {
        let essence = &self.essence;
        let expected = params.network_id();
        if essence.network_id != expected {
            return Err(SyntaxError::NetworkIdMismatch {
                expected,
                actual: essence.network_id,
            });
        }

        if essence.inputs.is_empty() {
            return Err(SyntaxError::NoInputs);
        }
        if essence.inputs.len() > MAX_INPUTS {
            return Err(SyntaxError::TooManyInputs(essence.inputs.len()));
        }
        let mut seen = HashSet::with_capacity(essence.inputs.len());
        for input in &essence.inputs {
            if !seen.insert(input) {
                return Err(SyntaxError::DuplicateInput(*input));
            }
        }

        if essence.context_inputs.len() > MAX_CONTEXT_INPUTS {
            return Err(SyntaxError::TooManyContextInputs(essence.context_inputs.len()));
        }
        let mut seen = HashSet::with_capacity(essence.context_inputs.len());
        for (index, context_input) in essence.context_inputs.iter().enumerate() {
            if !seen.insert(context_input) {
                return Err(SyntaxError::DuplicateContextInput(index));
            }
        }

        if essence.outputs.is_empty() {
            return Err(SyntaxError::NoOutputs);
        }
        if essence.outputs.len() > MAX_OUTPUTS {
            return Err(SyntaxError::TooManyOutputs(essence.outputs.len()));
        }
        let mut total: u64 = 0;
        for output in &essence.outputs {
            output.syntactic_validate(params)?;
            total = safe_add(total, output.amount(), "output amounts")?;
        }
        if total > params.token_supply {
            return Err(SyntaxError::AmountExceedsSupply {
                amount: total,
                supply: params.token_supply,
            });
        }
        essence.allotments.total()?;

        if let Some(payload) = &essence.payload {
            payload.syntactic_validate()?;
        }

        if self.unlocks.len() != essence.inputs.len() {
            return Err(SyntaxError::UnlockCountMismatch {
                inputs: essence.inputs.len(),
                unlocks: self.unlocks.len(),
            });
        }
        Ok(())
    }

    /// Work score of processing this transaction.
    pub fn work_score(&self, structure: &WorkScoreStructure) -> Result<WorkScore, ArithmeticError> {
        let essence = &self.essence;
        let outputs = WorkScore::sum(
            essence
                .outputs
                .iter()
                .map(|output| output.work_score(structure))
                .collect::<Result<Vec<_>, _>>()?,
        )?;
        let payload_kibibytes = essence
            .payload
            .as_ref()
            .map(|payload| payload.data_len().div_ceil(1024))
            .unwrap_or_default();
        WorkScore::sum([
            structure.input.multiply(essence.inputs.len())?,
            structure.context_input.multiply(essence.context_inputs.len())?,
            outputs,
            structure.allotment.multiply(essence.allotments.len())?,
            structure
                .signature_ed25519
                .multiply(self.unlocks.signature_count())?,
            structure.data_kibibyte.multiply(payload_kibibytes)?,
        ])
    }
}
