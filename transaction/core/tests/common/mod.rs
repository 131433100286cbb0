// Copyright (c) 2024 Botho Foundation
//
//! Shared setup for the validation integration tests.
//!
//! Transactions are assembled with the builder against a [TestLedger] and
//! validated with the default pipeline.

#![allow(dead_code)]

use ed25519_dalek::SigningKey;
use nova_transaction_builder::{InMemoryAddressSigner, TransactionBuilder};
use nova_transaction_core::{validate, Transaction, ValidationResult};
use nova_transaction_core_test_utils::{address_of, signing_key, test_params, TestLedger};
use nova_transaction_types::{Address, Output, OutputId, SlotIndex};

/// Slot test transactions are created in unless a test says otherwise.
pub const TX_SLOT: SlotIndex = 5;

/// A key and the address it controls.
pub struct Wallet {
    pub key: SigningKey,
    pub address: Address,
}

impl Wallet {
    pub fn new(seed: u64) -> Self {
        let key = signing_key(seed);
        let address = address_of(&key);
        Self { key, address }
    }
}

pub fn alice() -> Wallet {
    Wallet::new(1)
}

pub fn bob() -> Wallet {
    Wallet::new(2)
}

/// A signer holding the keys of `wallets`.
pub fn signer(wallets: &[&Wallet]) -> InMemoryAddressSigner {
    InMemoryAddressSigner::with_keys(wallets.iter().map(|wallet| wallet.key.clone()))
}

/// A builder for the test network created at `slot`.
pub fn builder_at(slot: SlotIndex) -> TransactionBuilder {
    let params = test_params();
    let mut builder = TransactionBuilder::new(params.network_id());
    builder
        .set_protocol_parameters(params)
        .set_creation_slot(slot);
    builder
}

/// A builder for the test network created at [TX_SLOT].
pub fn builder() -> TransactionBuilder {
    builder_at(TX_SLOT)
}

/// Add the ledger output `output_id`, owned by `owner`, as an input.
pub fn spend(
    builder: &mut TransactionBuilder,
    ledger: &TestLedger,
    output_id: OutputId,
    owner: Address,
) {
    builder.add_input(output_id, owner, ledger.output(&output_id));
}

/// Build and sign, panicking on builder errors.
pub fn sign(builder: TransactionBuilder, wallets: &[&Wallet]) -> Transaction {
    builder
        .build(Some(&signer(wallets)))
        .expect("transaction should build")
}

/// Run the default pipeline against the ledger.
pub fn validate_tx(tx: &Transaction, ledger: &TestLedger) -> ValidationResult<()> {
    validate(tx, &ledger.resolved, &ledger.credits, &test_params())
}

/// Sum of the outputs' amounts.
pub fn output_amounts(tx: &Transaction) -> u64 {
    tx.essence.outputs.iter().map(Output::amount).sum()
}
