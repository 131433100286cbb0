// Copyright (c) 2024 Botho Foundation

//! Integration tests for account transitions, including block issuers.

mod common;

use assert_matches::assert_matches;
use common::*;
use maplit::hashmap;
use nova_transaction_builder::AccountOutputBuilder;
use nova_transaction_core::{
    BlockIssuanceCreditMap, BlockIssuerError, ChainTransitionError, ValidationError,
    ViolationKind,
};
use nova_transaction_core_test_utils::{
    account_output, basic_output, conditions, TestLedger, TEST_LIVENESS_THRESHOLD,
};
use nova_transaction_types::{
    AccountId, AccountOutput, Address, BlockIssuerKey, ChainId, Feature, MetadataFeature,
    OutputId, SlotIndex, UnlockCondition,
};

const ACCOUNT: AccountId = AccountId([7u8; 32]);

fn issuer_key() -> BlockIssuerKey {
    BlockIssuerKey::Ed25519PublicKey([3u8; 32])
}

/// An existing account controlled by alice.
fn existing_account(ledger: &mut TestLedger, amount: u64) -> (OutputId, AccountOutput) {
    let account = account_output(amount, ACCOUNT, alice().address);
    (ledger.add(account.clone(), 1), account)
}

/// An existing block issuer account controlled by alice.
fn block_issuer(
    ledger: &mut TestLedger,
    mana: u64,
    expiry: SlotIndex,
) -> (OutputId, AccountOutput) {
    let account = AccountOutputBuilder::from_previous(
        &account_output(1_024, ACCOUNT, alice().address),
        &OutputId::default(),
    )
    .with_mana(mana)
    .with_block_issuer([issuer_key()], expiry)
    .build()
    .unwrap();
    (ledger.add(account.clone(), 1), account)
}

fn chain_error(err: ValidationError) -> ChainTransitionError {
    match err {
        ValidationError::ChainTransition { chain, error } => {
            assert_eq!(chain, ChainId::Account(ACCOUNT));
            error
        }
        other => panic!("expected a chain transition error, got {other:?}"),
    }
}

fn block_issuer_error(err: ValidationError) -> BlockIssuerError {
    match err {
        ValidationError::BlockIssuer { account, error } => {
            assert_eq!(account, ACCOUNT);
            error
        }
        other => panic!("expected a block issuer error, got {other:?}"),
    }
}

/// Transition the account at `account_in` into `next`, padding the base
/// tokens with `change` sent to alice.
fn transition(
    ledger: &TestLedger,
    account_in: OutputId,
    next: AccountOutput,
    change: u64,
) -> Result<(), ValidationError> {
    let alice = alice();
    let mut builder = builder();
    spend(&mut builder, ledger, account_in, alice.address);
    builder.add_output(next);
    if change > 0 {
        builder.add_output(basic_output(change, alice.address));
    }
    validate_tx(&sign(builder, &[&alice]), ledger)
}

/// A new account is created from plain funds.
#[test]
fn test_account_genesis() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let funds = ledger.add(basic_output(1_000, alice.address), 1);

    let mut builder = builder();
    spend(&mut builder, &ledger, funds, alice.address);
    builder.add_output(
        AccountOutputBuilder::new(1_000, alice.address, alice.address)
            .build()
            .unwrap(),
    );
    assert_eq!(validate_tx(&sign(builder, &[&alice]), &ledger), Ok(()));
}

/// A new account must not carry an id.
#[test]
fn test_account_genesis_with_id() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let funds = ledger.add(basic_output(1_000, alice.address), 1);

    let mut builder = builder();
    spend(&mut builder, &ledger, funds, alice.address);
    builder.add_output(account_output(1_000, ACCOUNT, alice.address));
    let err = validate_tx(&sign(builder, &[&alice]), &ledger).unwrap_err();
    assert_eq!(chain_error(err), ChainTransitionError::NonEmptyGenesisId);
}

/// The governor may replace the state controller without bumping the
/// state index.
#[test]
fn test_governance_changes_controller() {
    let bob = bob();
    let mut ledger = TestLedger::new();
    let (account_in, account) = existing_account(&mut ledger, 1_000);

    let next = AccountOutputBuilder::from_previous(&account, &account_in)
        .with_state_controller(bob.address)
        .build()
        .unwrap();
    assert_eq!(transition(&ledger, account_in, next, 0), Ok(()));
}

/// Governance transitions may not touch the amount.
#[test]
fn test_governance_cannot_change_amount() {
    let bob = bob();
    let mut ledger = TestLedger::new();
    let (account_in, account) = existing_account(&mut ledger, 1_000);

    let next = AccountOutputBuilder::from_previous(&account, &account_in)
        .with_state_controller(bob.address)
        .with_amount(900)
        .build()
        .unwrap();
    let err = transition(&ledger, account_in, next, 100).unwrap_err();
    assert_eq!(err.kind(), ViolationKind::InvalidChainTransition);
    assert_eq!(
        chain_error(err),
        ChainTransitionError::GovernanceFieldChanged("amount")
    );
}

/// A state transition bumps the index by one and may move tokens.
#[test]
fn test_state_transition() {
    let mut ledger = TestLedger::new();
    let (account_in, account) = existing_account(&mut ledger, 1_000);

    let next = AccountOutputBuilder::from_previous(&account, &account_in)
        .with_amount(700)
        .with_state_metadata(*b"counter=1")
        .next_state()
        .build()
        .unwrap();
    assert_eq!(transition(&ledger, account_in, next, 300), Ok(()));
}

/// The state index cannot skip ahead.
#[test]
fn test_state_index_jump_rejected() {
    let mut ledger = TestLedger::new();
    let (account_in, account) = existing_account(&mut ledger, 1_000);

    let mut next = account.clone();
    next.state_index = 2;
    assert_eq!(
        chain_error(transition(&ledger, account_in, next, 0).unwrap_err()),
        ChainTransitionError::InvalidStateIndex {
            current: 0,
            next: 2
        }
    );
}

/// The state controller cannot replace the governor.
#[test]
fn test_state_transition_freezes_governor() {
    let bob = bob();
    let mut ledger = TestLedger::new();
    let (account_in, account) = existing_account(&mut ledger, 1_000);

    let next = AccountOutputBuilder::from_previous(&account, &account_in)
        .with_governor(bob.address)
        .next_state()
        .build()
        .unwrap();
    assert_eq!(
        chain_error(transition(&ledger, account_in, next, 0).unwrap_err()),
        ChainTransitionError::StateTransitionFieldChanged("governor")
    );
}

/// The foundry counter only moves together with created foundries.
#[test]
fn test_foundry_counter_needs_foundries() {
    let mut ledger = TestLedger::new();
    let (account_in, account) = existing_account(&mut ledger, 1_000);

    let next = AccountOutputBuilder::from_previous(&account, &account_in)
        .create_foundries(1)
        .build()
        .unwrap();
    assert_eq!(
        chain_error(transition(&ledger, account_in, next, 0).unwrap_err()),
        ChainTransitionError::FoundryCountMismatch {
            expected: 1,
            created: 0
        }
    );
}

/// A metadata feature cannot appear in a state transition.
#[test]
fn test_metadata_feature_cannot_appear() {
    let mut ledger = TestLedger::new();
    let (account_in, account) = existing_account(&mut ledger, 1_000);

    let next = AccountOutputBuilder::from_previous(&account, &account_in)
        .add_feature(Feature::Metadata(MetadataFeature::single("k", *b"v")))
        .next_state()
        .build()
        .unwrap();
    assert_eq!(
        chain_error(transition(&ledger, account_in, next, 0).unwrap_err()),
        ChainTransitionError::MetadataFeatureChanged
    );
}

/// Outputs owned by an account are unlocked through the account input.
#[test]
fn test_account_owned_funds() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let (account_in, account) = existing_account(&mut ledger, 1_000);
    let funds = ledger.add(basic_output(500, Address::account(ACCOUNT)), 1);

    let mut builder = builder();
    spend(&mut builder, &ledger, account_in, alice.address);
    spend(&mut builder, &ledger, funds, Address::account(ACCOUNT));
    builder
        .add_output(
            AccountOutputBuilder::from_previous(&account, &account_in)
                .next_state()
                .build()
                .unwrap(),
        )
        .add_output(basic_output(500, alice.address));
    let tx = sign(builder, &[&alice]);
    assert_eq!(validate_tx(&tx, &ledger), Ok(()));
}

/// Destroying an account sends its tokens elsewhere.
#[test]
fn test_account_destroy() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let (account_in, _) = existing_account(&mut ledger, 1_000);

    let mut builder = builder();
    spend(&mut builder, &ledger, account_in, alice.address);
    builder.add_output(basic_output(1_000, alice.address));
    assert_eq!(validate_tx(&sign(builder, &[&alice]), &ledger), Ok(()));
}

/// A new block issuer's expiry must lie at least the liveness threshold
/// ahead.
#[test]
fn test_block_issuer_genesis_expiry() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let funds = ledger.add(basic_output(1_000, alice.address), 1);
    let min_slot = TX_SLOT + TEST_LIVENESS_THRESHOLD;

    let create = |expiry| {
        let mut builder = builder();
        spend(&mut builder, &ledger, funds, alice.address);
        builder.add_output(
            AccountOutputBuilder::new(1_000, alice.address, alice.address)
                .with_block_issuer([issuer_key()], expiry)
                .build()
                .unwrap(),
        );
        validate_tx(&sign(builder, &[&alice]), &ledger)
    };

    let err = create(min_slot - 1).unwrap_err();
    assert_eq!(err.kind(), ViolationKind::InvalidBlockIssuerTransition);
    assert_matches!(
        err,
        ValidationError::BlockIssuer {
            error: BlockIssuerError::ExpiryTooSoon { min_slot: 15, .. },
            ..
        }
    );
    assert_eq!(create(min_slot), Ok(()));
    assert_eq!(create(0), Ok(()));
}

/// Block issuer accounts need a known, non-negative credit.
#[test]
fn test_block_issuer_credit() {
    let mut ledger = TestLedger::new();
    let (account_in, account) = block_issuer(&mut ledger, 0, 100);
    // The 4 mana generated since slot 1 stay on the account.
    let next = AccountOutputBuilder::from_previous(&account, &account_in)
        .with_mana(4)
        .next_state()
        .build()
        .unwrap();

    assert_eq!(
        block_issuer_error(transition(&ledger, account_in, next.clone(), 0).unwrap_err()),
        BlockIssuerError::MissingCredit
    );
    ledger.set_credit(ACCOUNT, -1);
    assert_eq!(
        block_issuer_error(transition(&ledger, account_in, next.clone(), 0).unwrap_err()),
        BlockIssuerError::NegativeCredit(-1)
    );
    ledger.credits = hashmap! { ACCOUNT => 0 };
    assert_eq!(transition(&ledger, account_in, next, 0), Ok(()));
}

/// An active block issuer feature stays until it expires.
#[test]
fn test_block_issuer_removal() {
    let mut active = TestLedger::new();
    active.set_credit(ACCOUNT, 10);
    let (account_in, account) = block_issuer(&mut active, 0, 100);
    let removed = AccountOutputBuilder::from_previous(&account, &account_in)
        .remove_block_issuer()
        .next_state()
        .build()
        .unwrap();
    assert_eq!(
        block_issuer_error(transition(&active, account_in, removed, 0).unwrap_err()),
        BlockIssuerError::RemovedBeforeExpiry
    );

    let mut expired = TestLedger::new();
    expired.set_credit(ACCOUNT, 10);
    let (account_in, account) = block_issuer(&mut expired, 0, TX_SLOT - 1);
    let removed = AccountOutputBuilder::from_previous(&account, &account_in)
        .remove_block_issuer()
        .next_state()
        .build()
        .unwrap();
    assert_eq!(transition(&expired, account_in, removed, 0), Ok(()));
}

/// Extending an active feature must respect the liveness threshold.
#[test]
fn test_block_issuer_expiry_change() {
    let mut ledger = TestLedger::new();
    ledger.set_credit(ACCOUNT, 0);
    let (account_in, account) = block_issuer(&mut ledger, 0, 12);

    let extend = |expiry| {
        let next = AccountOutputBuilder::from_previous(&account, &account_in)
            .with_block_issuer([issuer_key()], expiry)
            .with_mana(4)
            .next_state()
            .build()
            .unwrap();
        transition(&ledger, account_in, next, 0)
    };

    assert_matches!(
        extend(14).map_err(block_issuer_error),
        Err(BlockIssuerError::ExpiryTooSoon { expiry: 14, min_slot: 15 })
    );
    assert_eq!(extend(15), Ok(()));
    // Unchanged expiry is never too soon.
    assert_eq!(extend(12), Ok(()));
}

/// An expired block issuer that keeps its feature must push the expiry
/// past the liveness threshold.
#[test]
fn test_expired_block_issuer_reextension() {
    let mut ledger = TestLedger::new();
    ledger.set_credit(ACCOUNT, 0);
    let expired = TX_SLOT - 1;
    let (account_in, account) = block_issuer(&mut ledger, 0, expired);

    let extend = |expiry| {
        let next = AccountOutputBuilder::from_previous(&account, &account_in)
            .with_block_issuer([issuer_key()], expiry)
            .with_mana(4)
            .next_state()
            .build()
            .unwrap();
        transition(&ledger, account_in, next, 0)
    };

    let min_slot = TX_SLOT + TEST_LIVENESS_THRESHOLD;
    assert_eq!(
        extend(expired).map_err(block_issuer_error),
        Err(BlockIssuerError::ExpiryTooSoon {
            expiry: expired,
            min_slot
        })
    );
    assert_eq!(
        extend(min_slot - 1).map_err(block_issuer_error),
        Err(BlockIssuerError::ExpiryTooSoon {
            expiry: min_slot - 1,
            min_slot
        })
    );
    assert_eq!(extend(min_slot), Ok(()));
}

/// Destroying a block issuer before its feature expires is rejected
/// whatever its credit.
#[test]
fn test_block_issuer_destroy_before_expiry() {
    let alice = alice();
    for credit in [-5, 0, 5] {
        let mut ledger = TestLedger::new();
        ledger.set_credit(ACCOUNT, credit);
        let (account_in, _) = block_issuer(&mut ledger, 0, 100);

        let mut builder = builder();
        spend(&mut builder, &ledger, account_in, alice.address);
        builder.add_output(basic_output(1_024, alice.address));
        let err = validate_tx(&sign(builder, &[&alice]), &ledger).unwrap_err();
        assert_eq!(block_issuer_error(err), BlockIssuerError::DestroyedBeforeExpiry(100));
    }
}

/// An expired block issuer may be destroyed if its credit is known and
/// non-negative.
#[test]
fn test_block_issuer_destroy_after_expiry() {
    let alice = alice();
    let destroy = |credits: BlockIssuanceCreditMap| {
        let mut ledger = TestLedger::new();
        ledger.credits = credits;
        let (account_in, _) = block_issuer(&mut ledger, 0, TX_SLOT - 1);
        let mut builder = builder();
        spend(&mut builder, &ledger, account_in, alice.address);
        builder.add_output(basic_output(1_024, alice.address));
        validate_tx(&sign(builder, &[&alice]), &ledger)
    };

    assert_eq!(destroy(hashmap! { ACCOUNT => 0 }), Ok(()));
    assert_eq!(
        destroy(BlockIssuanceCreditMap::new()).map_err(block_issuer_error),
        Err(BlockIssuerError::MissingCredit)
    );
}

/// A block issuer's mana may only leave the account into outputs locked
/// back to it for at least the liveness threshold.
#[test]
fn test_block_issuer_mana_lock_boundary() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    ledger.set_credit(ACCOUNT, 0);
    // 100 stored plus 4 generated by 1024 tokens over 4 slots.
    let (account_in, account) = block_issuer(&mut ledger, 100, 100);
    let min_slot = TX_SLOT + TEST_LIVENESS_THRESHOLD;

    let move_mana = |timelock: SlotIndex| {
        let next = AccountOutputBuilder::from_previous(&account, &account_in)
            .with_amount(1_000)
            .with_mana(90)
            .next_state()
            .build()
            .unwrap();
        let mut locked = basic_output(24, Address::account(ACCOUNT));
        locked.mana = 14;
        locked.unlock_conditions = conditions(vec![
            UnlockCondition::address(Address::account(ACCOUNT)),
            UnlockCondition::timelock(timelock),
        ]);
        let mut builder = builder();
        spend(&mut builder, &ledger, account_in, alice.address);
        builder.add_output(next).add_output(locked);
        validate_tx(&sign(builder, &[&alice]), &ledger)
    };

    assert_eq!(move_mana(min_slot), Ok(()));
    assert_eq!(
        move_mana(min_slot - 1).map_err(block_issuer_error),
        Err(BlockIssuerError::ManaMovedOffAccount {
            account_mana: 104,
            retained: 90
        })
    );
}

/// Mana allotted to the issuer account itself stays with the account.
#[test]
fn test_block_issuer_allotment_counts_as_retained() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    ledger.set_credit(ACCOUNT, 0);
    let (account_in, account) = block_issuer(&mut ledger, 100, 100);

    let allot = |account_id: AccountId| {
        let next = AccountOutputBuilder::from_previous(&account, &account_in)
            .with_mana(4)
            .next_state()
            .build()
            .unwrap();
        let mut builder = builder();
        spend(&mut builder, &ledger, account_in, alice.address);
        builder.add_output(next).add_allotment(account_id, 100);
        validate_tx(&sign(builder, &[&alice]), &ledger)
    };

    assert_eq!(allot(ACCOUNT), Ok(()));
    assert_matches!(
        allot(AccountId([1u8; 32])).map_err(block_issuer_error),
        Err(BlockIssuerError::ManaMovedOffAccount { retained: 4, .. })
    );
}
