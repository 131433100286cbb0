// Copyright (c) 2024 Botho Foundation

//! Fixtures shared by the transaction core and builder tests.

use ed25519_dalek::SigningKey;
use nova_transaction_core::{BlockIssuanceCreditMap, OutputWithCreationSlot, ResolvedInputs};
use nova_transaction_types::{
    AccountId, AccountOutput, Address, BaseToken, BasicOutput, BlockIssuanceCredits,
    Ed25519Address, Features, FoundryOutput, NftId, NftOutput, Output, OutputId,
    ProtocolParameters, RentStructure, SimpleTokenScheme, SlotIndex, TokenScheme,
    TransactionId, UnlockCondition, UnlockConditions, U256,
};
use rand::{rngs::StdRng, RngCore, SeedableRng};

pub use nova_transaction_types::AccountAddress;

/// Liveness threshold of [test_params].
pub const TEST_LIVENESS_THRESHOLD: SlotIndex = 10;

/// Protocol parameters for tests: no storage deposit, eight slots per epoch,
/// mana halving every epoch and generated at one unit per 1024 base tokens
/// per slot.
pub fn test_params() -> ProtocolParameters {
    ProtocolParameters {
        network_name: "nova-test".to_owned(),
        rent_structure: RentStructure {
            vbyte_cost: 0,
            ..Default::default()
        },
        slots_per_epoch_exponent: 3,
        mana_generation_rate: 1,
        mana_generation_rate_exponent: 10,
        mana_decay_factors: vec![1 << 31],
        mana_decay_factors_exponent: 32,
        mana_decay_factor_epochs_sum: 1 << 31,
        mana_decay_factor_epochs_sum_exponent: 31,
        liveness_threshold: TEST_LIVENESS_THRESHOLD,
        ..Default::default()
    }
}

/// A signing key derived deterministically from `seed`.
pub fn signing_key(seed: u64) -> SigningKey {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    SigningKey::from_bytes(&bytes)
}

/// The Ed25519 address of `key`.
pub fn address_of(key: &SigningKey) -> Address {
    Address::Ed25519(Ed25519Address::from_public_key_bytes(
        key.verifying_key().as_bytes(),
    ))
}

/// Unspent outputs and block issuance credits standing in for the ledger.
#[derive(Debug, Default)]
pub struct TestLedger {
    /// Unspent outputs by id.
    pub resolved: ResolvedInputs,
    /// Known block issuance credits.
    pub credits: BlockIssuanceCreditMap,
    next: u8,
}

impl TestLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unspent output created in `creation_slot`, returning its id.
    pub fn add(&mut self, output: impl Into<Output>, creation_slot: SlotIndex) -> OutputId {
        self.next += 1;
        let output_id = OutputId::new(TransactionId([self.next; 32]), 0);
        self.resolved
            .insert(output_id, OutputWithCreationSlot::new(output, creation_slot));
        output_id
    }

    /// The output stored under `output_id`.
    pub fn output(&self, output_id: &OutputId) -> Output {
        self.resolved[output_id].output.clone()
    }

    /// Record the credit of `account_id`.
    pub fn set_credit(&mut self, account_id: AccountId, credit: BlockIssuanceCredits) {
        self.credits.insert(account_id, credit);
    }
}

/// Unlock conditions from a list, panicking on invalid ones.
pub fn conditions(conditions: Vec<UnlockCondition>) -> UnlockConditions {
    UnlockConditions::from_vec(conditions).unwrap()
}

/// A basic output owned by `owner`.
pub fn basic_output(amount: BaseToken, owner: Address) -> BasicOutput {
    BasicOutput {
        amount,
        mana: 0,
        native_tokens: Default::default(),
        unlock_conditions: conditions(vec![UnlockCondition::address(owner)]),
        features: Features::default(),
    }
}

/// An account controlled and governed by `controller`.
pub fn account_output(
    amount: BaseToken,
    account_id: AccountId,
    controller: Address,
) -> AccountOutput {
    AccountOutput {
        amount,
        mana: 0,
        native_tokens: Default::default(),
        account_id,
        state_index: 0,
        state_metadata: vec![],
        foundry_counter: 0,
        unlock_conditions: conditions(vec![
            UnlockCondition::StateControllerAddress(controller),
            UnlockCondition::GovernorAddress(controller),
        ]),
        features: Features::default(),
        immutable_features: Features::default(),
    }
}

/// A foundry of `account_id` with a simple token scheme.
pub fn foundry_output(
    amount: BaseToken,
    account_id: AccountId,
    serial_number: u32,
    minted: impl Into<U256>,
    maximum_supply: impl Into<U256>,
) -> FoundryOutput {
    FoundryOutput {
        amount,
        mana: 0,
        native_tokens: Default::default(),
        serial_number,
        token_scheme: TokenScheme::Simple(SimpleTokenScheme::new(minted, 0u64, maximum_supply)),
        unlock_conditions: conditions(vec![UnlockCondition::ImmutableAccountAddress(
            AccountAddress(account_id),
        )]),
        features: Features::default(),
        immutable_features: Features::default(),
    }
}

/// An NFT owned by `owner`.
pub fn nft_output(amount: BaseToken, nft_id: NftId, owner: Address) -> NftOutput {
    NftOutput {
        amount,
        mana: 0,
        native_tokens: Default::default(),
        nft_id,
        unlock_conditions: conditions(vec![UnlockCondition::address(owner)]),
        features: Features::default(),
        immutable_features: Features::default(),
    }
}
