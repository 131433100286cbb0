// Copyright (c) 2024 Botho Foundation

//! The resolved view of a transaction that every check runs against.

use super::error::{ValidationError, ValidationResult};
use crate::{essence::inputs_commitment, tx::Transaction};
use nova_transaction_types::{
    native_token::accumulate_native_token, AccountId, Address, BlockIssuanceCredits, ChainId,
    ManaDecayProvider, NativeTokenSum, Output, OutputId, OutputKind, ProtocolParameters,
    SlotIndex, SyntaxError, TransactionId,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// A consumed output together with the slot it was created in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputWithCreationSlot {
    /// The output.
    pub output: Output,
    /// Creation slot of the transaction that created it.
    pub creation_slot: SlotIndex,
}

impl OutputWithCreationSlot {
    /// Pair an output with its creation slot.
    pub fn new(output: impl Into<Output>, creation_slot: SlotIndex) -> Self {
        Self {
            output: output.into(),
            creation_slot,
        }
    }
}

/// The ledger's unspent outputs a transaction may consume.
pub type ResolvedInputs = HashMap<OutputId, OutputWithCreationSlot>;

/// Block issuance credit per account, as known to the ledger.
pub type BlockIssuanceCreditMap = HashMap<AccountId, BlockIssuanceCredits>;

/// A consumed output as seen by the checks.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedInput<'a> {
    /// Reference the transaction consumes.
    pub output_id: OutputId,
    /// The consumed output.
    pub output: &'a Output,
    /// Slot the consumed output was created in.
    pub creation_slot: SlotIndex,
}

/// How an address was proven unlocked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnlockedAddress {
    /// Input position that unlocked it.
    pub index: usize,
    /// Whether a signature unlocked it, as opposed to consuming the chain
    /// output behind a chain address.
    pub by_signature: bool,
}

/// Everything the checks need, resolved once per validation run.
pub struct WorkingSet<'a> {
    /// The transaction under validation.
    pub tx: &'a Transaction,
    /// Protocol parameters.
    pub params: &'a ProtocolParameters,
    /// Id of the transaction.
    pub tx_id: TransactionId,
    /// Message the signature unlocks sign.
    pub signing_message: [u8; 32],
    /// Consumed outputs in input order.
    pub inputs: Vec<ResolvedInput<'a>>,
    /// Output positions grouped by output kind.
    pub outputs_by_kind: BTreeMap<OutputKind, Vec<usize>>,
    /// Consumed chains by resolved id, pointing at the input position.
    pub in_chains: HashMap<ChainId, usize>,
    /// Created chains by resolved id, pointing at the output position.
    pub out_chains: HashMap<ChainId, usize>,
    /// Output positions of foundries created by this transaction, per
    /// anchoring account, in output order.
    pub new_foundries: HashMap<AccountId, Vec<usize>>,
    /// Native token sums over the inputs.
    pub in_native_tokens: NativeTokenSum,
    /// Native token sums over the outputs.
    pub out_native_tokens: NativeTokenSum,
    /// Block issuance credits of the accounts the ledger knows.
    pub block_issuance_credits: &'a BlockIssuanceCreditMap,
    /// Addresses proven unlocked so far, filled by the unlock check.
    pub unlocked: BTreeMap<Address, UnlockedAddress>,
    /// Mana decay engine for the protocol parameters.
    pub mana_decay: ManaDecayProvider,
}

impl<'a> WorkingSet<'a> {
    /// Resolve the inputs of `tx` and aggregate everything the checks need.
    pub fn new(
        tx: &'a Transaction,
        resolved: &'a ResolvedInputs,
        block_issuance_credits: &'a BlockIssuanceCreditMap,
        params: &'a ProtocolParameters,
    ) -> ValidationResult<Self> {
        let essence = &tx.essence;
        let tx_id = tx.id()?;
        let signing_message = essence.signing_message()?;

        let inputs = essence
            .inputs
            .iter()
            .map(|output_id| {
                resolved
                    .get(output_id)
                    .map(|input| ResolvedInput {
                        output_id: *output_id,
                        output: &input.output,
                        creation_slot: input.creation_slot,
                    })
                    .ok_or(ValidationError::InputNotResolved(*output_id))
            })
            .collect::<ValidationResult<Vec<_>>>()?;

        let commitment = inputs_commitment(inputs.iter().map(|input| input.output))?;
        if commitment != essence.inputs_commitment {
            return Err(ValidationError::InputsCommitmentMismatch);
        }

        let mut in_chains = HashMap::new();
        let mut in_native_tokens = NativeTokenSum::new();
        for (index, input) in inputs.iter().enumerate() {
            if let Some(chain_id) = input.output.resolved_chain_id(&input.output_id) {
                if in_chains.insert(chain_id, index).is_some() {
                    return Err(ValidationError::DuplicateChainInput(chain_id));
                }
            }
            for token in input.output.all_native_tokens() {
                accumulate_native_token(&mut in_native_tokens, token)?;
            }
        }

        let mut out_chains = HashMap::new();
        let mut out_native_tokens = NativeTokenSum::new();
        let mut outputs_by_kind: BTreeMap<OutputKind, Vec<usize>> = BTreeMap::new();
        let mut new_foundries: HashMap<AccountId, Vec<usize>> = HashMap::new();
        for (index, output) in essence.outputs.iter().enumerate() {
            let position = u16::try_from(index)
                .map_err(|_| SyntaxError::TooManyOutputs(essence.outputs.len()))?;
            if let Some(chain_id) = output.resolved_chain_id(&OutputId::new(tx_id, position)) {
                if out_chains.insert(chain_id, index).is_some() {
                    return Err(ValidationError::DuplicateChainOutput(chain_id));
                }
                if let (ChainId::Foundry(foundry_id), false) =
                    (chain_id, in_chains.contains_key(&chain_id))
                {
                    new_foundries
                        .entry(foundry_id.account_id)
                        .or_default()
                        .push(index);
                }
            }
            for token in output.all_native_tokens() {
                accumulate_native_token(&mut out_native_tokens, token)?;
            }
            outputs_by_kind.entry(output.kind()).or_default().push(index);
        }

        debug!(
            tx_id = %tx_id,
            inputs = inputs.len(),
            outputs = essence.outputs.len(),
            in_chains = in_chains.len(),
            out_chains = out_chains.len(),
            "working set resolved"
        );

        Ok(Self {
            tx,
            params,
            tx_id,
            signing_message,
            inputs,
            outputs_by_kind,
            in_chains,
            out_chains,
            new_foundries,
            in_native_tokens,
            out_native_tokens,
            block_issuance_credits,
            unlocked: BTreeMap::new(),
            mana_decay: params.mana_decay_provider(),
        })
    }

    /// Creation slot of the transaction.
    pub fn creation_slot(&self) -> SlotIndex {
        self.tx.essence.creation_slot
    }

    /// Created outputs.
    pub fn outputs(&self) -> &'a [Output] {
        &self.tx.essence.outputs
    }

    /// Created outputs of `kind`, in output order.
    pub fn outputs_of_kind(&self, kind: OutputKind) -> impl Iterator<Item = &'a Output> + '_ {
        let outputs = self.outputs();
        self.outputs_by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(move |index| &outputs[*index])
    }

    /// The created output continuing a consumed chain, if any.
    pub fn next_state(&self, chain_id: &ChainId) -> Option<&'a Output> {
        let outputs = self.outputs();
        self.out_chains.get(chain_id).map(|index| &outputs[*index])
    }

    /// The consumed input of a chain, if any.
    pub fn current_state(&self, chain_id: &ChainId) -> Option<&ResolvedInput<'a>> {
        self.in_chains.get(chain_id).map(|index| &self.inputs[*index])
    }

    /// The address that must unlock the input at `index`.
    ///
    /// Accounts are unlocked by their state controller when the transaction
    /// advances their state index and by their governor otherwise. Foundries
    /// are unlocked by their anchoring account. Other outputs are owned by
    /// their address condition, or by the expiration return address once
    /// expired.
    pub fn input_owner(&self, index: usize) -> ValidationResult<Address> {
        let input = &self.inputs[index];
        let owner = match input.output {
            Output::Account(current) => {
                let chain_id =
                    ChainId::Account(current.account_id.or_from_output_id(&input.output_id));
                let state_transition = matches!(
                    self.next_state(&chain_id),
                    Some(Output::Account(next)) if next.state_index != current.state_index
                );
                if state_transition {
                    current.state_controller_address().copied()
                } else {
                    current.governor_address().copied()
                }
            }
            Output::Foundry(foundry) => foundry
                .account_address()
                .map(|address| Address::Account(*address)),
            output => output
                .unlock_conditions()
                .owner_at(self.creation_slot())
                .copied(),
        };
        owner.ok_or(ValidationError::MissingOwner(index))
    }
}
