// Copyright (c) 2024 Botho Foundation

//! The validation pipeline and its generic checks.

use super::{
    chain::validate_chain_transitions,
    error::{ValidationError, ValidationResult},
    unlock::{is_unlocked, validate_input_unlocks},
    working_set::{BlockIssuanceCreditMap, ResolvedInputs, WorkingSet},
};
use crate::tx::Transaction;
use nova_transaction_types::{
    amount::{safe_add, safe_sum},
    constants::MAX_NATIVE_TOKENS_PER_TRANSACTION,
    Address, BaseToken, ChainId, Output, ProtocolParameters, U256,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};
use tracing::{debug, warn};

/// Determines if the transaction is valid with respect to the outputs it
/// consumes and the block issuance credits known to the ledger.
///
/// # Arguments
/// * `tx` - The transaction to validate.
/// * `resolved_inputs` - The unspent outputs the transaction may consume.
/// * `block_issuance_credits` - Credit of the accounts the ledger knows.
/// * `params` - Protocol parameters.
pub fn validate(
    tx: &Transaction,
    resolved_inputs: &ResolvedInputs,
    block_issuance_credits: &BlockIssuanceCreditMap,
    params: &ProtocolParameters,
) -> ValidationResult<()> {
    tx.syntactic_validate(params)?;
    Vm::default().execute(tx, resolved_inputs, block_issuance_credits, params)
}

/// One check of the pipeline.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Check {
    /// Every input's timelock has passed.
    Timelocks,
    /// Every input is unlocked by its owner.
    InputUnlocks,
    /// Every sender feature names an unlocked address.
    SenderUnlocked,
    /// Base tokens are conserved and storage deposits returned.
    BalancedBaseTokens,
    /// Native tokens are conserved unless a foundry mints or melts them.
    BalancedNativeTokens,
    /// Every chain output transition is valid.
    ChainTransitions,
    /// Output mana and allotments are covered by the inputs' mana.
    BalancedMana,
}

impl Check {
    /// The default pipeline.
    pub const DEFAULT_ORDER: [Check; 7] = [
        Check::Timelocks,
        Check::InputUnlocks,
        Check::SenderUnlocked,
        Check::BalancedBaseTokens,
        Check::BalancedNativeTokens,
        Check::ChainTransitions,
        Check::BalancedMana,
    ];

    fn run(&self, ws: &mut WorkingSet) -> ValidationResult<()> {
        match self {
            Check::Timelocks => validate_timelocks(ws),
            Check::InputUnlocks => validate_input_unlocks(ws),
            Check::SenderUnlocked => validate_senders_unlocked(ws),
            Check::BalancedBaseTokens => validate_balanced_base_tokens(ws),
            Check::BalancedNativeTokens => validate_balanced_native_tokens(ws),
            Check::ChainTransitions => validate_chain_transitions(ws),
            Check::BalancedMana => validate_balanced_mana(ws),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Runs an ordered list of checks against a transaction, stopping at the
/// first failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vm {
    checks: Vec<Check>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new(Check::DEFAULT_ORDER)
    }
}

impl Vm {
    /// A pipeline running `checks` in order.
    pub fn new(checks: impl Into<Vec<Check>>) -> Self {
        Self {
            checks: checks.into(),
        }
    }

    /// The checks this pipeline runs.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Resolve the working set for `tx` and run every check on it.
    ///
    /// Syntactic validation is the caller's business, see [validate].
    pub fn execute(
        &self,
        tx: &Transaction,
        resolved_inputs: &ResolvedInputs,
        block_issuance_credits: &BlockIssuanceCreditMap,
        params: &ProtocolParameters,
    ) -> ValidationResult<()> {
        let mut ws = WorkingSet::new(tx, resolved_inputs, block_issuance_credits, params)?;
        for check in &self.checks {
            debug!(tx_id = %ws.tx_id, check = %check, "running check");
            if let Err(err) = check.run(&mut ws) {
                warn!(
                    tx_id = %ws.tx_id,
                    check = %check,
                    kind = ?err.kind(),
                    "transaction rejected: {}",
                    err
                );
                return Err(err);
            }
        }
        debug!(tx_id = %ws.tx_id, "transaction valid");
        Ok(())
    }
}

/// Every input's timelock must have passed at the creation slot.
pub fn validate_timelocks(ws: &WorkingSet) -> ValidationResult<()> {
    let slot = ws.creation_slot();
    for (index, input) in ws.inputs.iter().enumerate() {
        input
            .output
            .unlock_conditions()
            .timelock_expired(slot)
            .map_err(|until| ValidationError::TimelockNotExpired { index, until })?;
    }
    Ok(())
}

/// Every sender feature on an output must name an unlocked address.
pub fn validate_senders_unlocked(ws: &WorkingSet) -> ValidationResult<()> {
    for output in ws.outputs() {
        if let Some(sender) = output.features().sender() {
            if !is_unlocked(ws, &sender.address) {
                return Err(ValidationError::SenderNotUnlocked(sender.address));
            }
        }
    }
    Ok(())
}

/// Base tokens must be conserved, and every storage deposit return owed to
/// someone other than the unlocking owner must be paid back through simple
/// transfers.
pub fn validate_balanced_base_tokens(ws: &WorkingSet) -> ValidationResult<()> {
    let input_sum = safe_sum(
        ws.inputs.iter().map(|input| input.output.amount()),
        "input amounts",
    )?;
    let output_sum = safe_sum(ws.outputs().iter().map(Output::amount), "output amounts")?;
    if input_sum != output_sum {
        warn!(expected = input_sum, got = output_sum, "base tokens unbalanced");
        return Err(ValidationError::UnbalancedBaseTokens {
            input: input_sum,
            output: output_sum,
        });
    }

    let mut required: BTreeMap<Address, BaseToken> = BTreeMap::new();
    for (index, input) in ws.inputs.iter().enumerate() {
        let Some(sdr) = input.output.unlock_conditions().storage_deposit_return() else {
            continue;
        };
        if ws.input_owner(index)? == sdr.return_address {
            continue;
        }
        let owed = required.entry(sdr.return_address).or_default();
        *owed = safe_add(*owed, sdr.amount, "storage deposit return")?;
    }
    if required.is_empty() {
        return Ok(());
    }

    let mut returned: BTreeMap<Address, BaseToken> = BTreeMap::new();
    for output in ws.outputs() {
        let Some(basic) = output.as_basic().filter(|basic| basic.is_simple_transfer()) else {
            continue;
        };
        if let Some(address) = basic.address() {
            let sum = returned.entry(*address).or_default();
            *sum = safe_add(*sum, basic.amount, "returned deposit")?;
        }
    }
    for (address, required) in required {
        let returned = returned.get(&address).copied().unwrap_or_default();
        if returned < required {
            warn!(
                address = %address,
                expected = required,
                got = returned,
                "storage deposit not returned"
            );
            return Err(ValidationError::StorageDepositReturnUnfulfilled {
                address,
                required,
                returned,
            });
        }
    }
    Ok(())
}

/// Native tokens must balance per token id unless the foundry of that token
/// takes part in the transaction, in which case its token scheme decides.
pub fn validate_balanced_native_tokens(ws: &WorkingSet) -> ValidationResult<()> {
    let ids: BTreeSet<_> = ws
        .in_native_tokens
        .keys()
        .chain(ws.out_native_tokens.keys())
        .copied()
        .collect();
    if ids.len() > MAX_NATIVE_TOKENS_PER_TRANSACTION {
        return Err(ValidationError::TooManyNativeTokens(ids.len()));
    }

    let zero = U256::zero();
    for id in ids {
        let input = *ws.in_native_tokens.get(&id).unwrap_or(&zero);
        let output = *ws.out_native_tokens.get(&id).unwrap_or(&zero);
        if input == output {
            continue;
        }
        let foundry = ChainId::Foundry(id);
        if ws.in_chains.contains_key(&foundry) || ws.out_chains.contains_key(&foundry) {
            continue;
        }
        warn!(token = %id, expected = %input, got = %output, "native token unbalanced");
        return Err(ValidationError::UnbalancedNativeToken { id, input, output });
    }
    Ok(())
}

/// The inputs' stored mana, decayed to the creation slot, plus the potential
/// mana they generated must cover the output mana and the allotments.
pub fn validate_balanced_mana(ws: &WorkingSet) -> ValidationResult<()> {
    let slot = ws.creation_slot();
    let decay = &ws.mana_decay;
    let mut available: u64 = 0;
    for (index, input) in ws.inputs.iter().enumerate() {
        if input.creation_slot > slot {
            return Err(ValidationError::InputCreatedAfterTransaction {
                index,
                created: input.creation_slot,
                creation_slot: slot,
            });
        }
        let stored = decay.stored_mana_with_decay(input.output.mana(), input.creation_slot, slot)?;
        let potential =
            decay.potential_mana_with_decay(input.output.amount(), input.creation_slot, slot)?;
        available = safe_add(available, stored, "input mana")?;
        available = safe_add(available, potential, "input mana")?;
    }

    let output_mana = safe_sum(ws.outputs().iter().map(Output::mana), "output mana")?;
    let required = safe_add(output_mana, ws.tx.essence.allotments.total()?, "output mana")?;
    if available < required {
        warn!(expected = required, got = available, "mana unbalanced");
        return Err(ValidationError::UnbalancedMana {
            available,
            required,
        });
    }
    Ok(())
}
