// Copyright (c) 2024 Botho Foundation

//! Integration tests for foundry and NFT transitions.

mod common;

use assert_matches::assert_matches;
use common::*;
use nova_transaction_builder::{AccountOutputBuilder, FoundryOutputBuilder, NftOutputBuilder};
use nova_transaction_core::{ChainTransitionError, ValidationError};
use nova_transaction_core_test_utils::{account_output, basic_output, nft_output, TestLedger};
use nova_transaction_types::{
    AccountId, Address, BasicOutput, ChainId, Feature, Features, FoundryId, FoundryOutput,
    IssuerFeature, MetadataFeature, NativeToken, NativeTokens, NftId, OutputId,
    SimpleTokenScheme, TokenScheme, TokenSchemeError, U256,
};

const ACCOUNT: AccountId = AccountId([7u8; 32]);
const NFT: NftId = NftId([5u8; 32]);

fn token(serial_number: u32) -> FoundryId {
    FoundryId::new(ACCOUNT, serial_number, 0)
}

fn scheme(minted: u64, melted: u64) -> TokenScheme {
    TokenScheme::Simple(SimpleTokenScheme::new(minted, melted, 1_000u64))
}

fn new_foundry(serial_number: u32, minted: u64) -> FoundryOutput {
    FoundryOutputBuilder::new(50, ACCOUNT, serial_number, scheme(minted, 0))
        .build()
        .unwrap()
}

/// A basic output of alice holding `tokens` of the foundry `serial_number`.
fn holding(amount: u64, serial_number: u32, tokens: u64) -> BasicOutput {
    let mut output = basic_output(amount, alice().address);
    output.native_tokens =
        NativeTokens::from_vec(vec![NativeToken::new(token(serial_number), tokens)]).unwrap();
    output
}

fn chain_error(err: ValidationError) -> (ChainId, ChainTransitionError) {
    match err {
        ValidationError::ChainTransition { chain, error } => (chain, error),
        other => panic!("expected a chain transition error, got {other:?}"),
    }
}

/// Create foundries in one account transition bumping the counter by
/// `created`, with every foundry holding 50 base tokens.
fn create_foundries(
    created: u32,
    foundries: Vec<FoundryOutput>,
    extra: Vec<BasicOutput>,
) -> Result<(), ValidationError> {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let account = account_output(1_000, ACCOUNT, alice.address);
    let account_in = ledger.add(account.clone(), 1);

    let spent_elsewhere =
        50 * foundries.len() as u64 + extra.iter().map(|output| output.amount).sum::<u64>();
    let mut builder = builder();
    spend(&mut builder, &ledger, account_in, alice.address);
    builder.add_output(
        AccountOutputBuilder::from_previous(&account, &account_in)
            .with_amount(1_000 - spent_elsewhere)
            .create_foundries(created)
            .build()
            .unwrap(),
    );
    for foundry in foundries {
        builder.add_output(foundry);
    }
    for output in extra {
        builder.add_output(output);
    }
    validate_tx(&sign(builder, &[&alice]), &ledger)
}

/// A new foundry takes the serial of the account's counter and mints into
/// the transaction's outputs.
#[test]
fn test_foundry_genesis_mints() {
    assert_eq!(
        create_foundries(1, vec![new_foundry(0, 50)], vec![holding(50, 0, 50)]),
        Ok(())
    );
}

/// Genesis must mint exactly the tokens the outputs hold.
#[test]
fn test_foundry_genesis_mint_mismatch() {
    let (chain, error) = chain_error(
        create_foundries(1, vec![new_foundry(0, 50)], vec![holding(50, 0, 40)]).unwrap_err(),
    );
    assert_eq!(chain, ChainId::Foundry(token(0)));
    assert_matches!(
        error,
        ChainTransitionError::TokenScheme(TokenSchemeError::GenesisMintMismatch { .. })
    );
}

/// A serial beyond the counter's new range is rejected.
#[test]
fn test_foundry_serial_out_of_range() {
    let (chain, error) =
        chain_error(create_foundries(1, vec![new_foundry(2, 0)], vec![]).unwrap_err());
    assert_eq!(chain, ChainId::Foundry(token(2)));
    assert_eq!(
        error,
        ChainTransitionError::SerialOutOfRange {
            serial: 2,
            start: 0,
            end: 1
        }
    );
}

/// Serials increase in the order the new foundries appear.
#[test]
fn test_foundry_serials_increase() {
    assert_eq!(
        create_foundries(2, vec![new_foundry(0, 0), new_foundry(1, 0)], vec![]),
        Ok(())
    );
    let (chain, error) = chain_error(
        create_foundries(2, vec![new_foundry(1, 0), new_foundry(0, 0)], vec![]).unwrap_err(),
    );
    assert_eq!(chain, ChainId::Foundry(token(0)));
    assert_eq!(
        error,
        ChainTransitionError::SerialNotIncreasing {
            serial: 0,
            previous: 1
        }
    );
}

/// A foundry cannot be created without its account transitioning.
#[test]
fn test_foundry_needs_anchor_account() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let funds = ledger.add(basic_output(1_000, alice.address), 1);

    let mut builder = builder();
    spend(&mut builder, &ledger, funds, alice.address);
    builder
        .add_output(new_foundry(0, 0))
        .add_output(basic_output(950, alice.address));
    let (_, error) = chain_error(validate_tx(&sign(builder, &[&alice]), &ledger).unwrap_err());
    assert_eq!(error, ChainTransitionError::MissingAnchorAccount(ACCOUNT));
}

/// An existing account with one foundry, both in the ledger.
struct Minting {
    ledger: TestLedger,
    account_in: OutputId,
    foundry_in: OutputId,
}

impl Minting {
    fn new(foundry: FoundryOutput) -> Self {
        let mut ledger = TestLedger::new();
        let mut account = account_output(1_000, ACCOUNT, alice().address);
        account.foundry_counter = 1;
        let account_in = ledger.add(account, 1);
        let foundry_in = ledger.add(foundry, 1);
        Self {
            ledger,
            account_in,
            foundry_in,
        }
    }

    /// Transition the account, replace the foundry with `next` (or destroy
    /// it) and add `outputs`.
    fn run(
        &self,
        next: Option<FoundryOutput>,
        outputs: Vec<BasicOutput>,
    ) -> Result<(), ValidationError> {
        let alice = alice();
        let account = self.ledger.output(&self.account_in);
        let account = account.as_account().unwrap();
        let released: u64 = outputs.iter().map(|output| output.amount).sum();
        let kept = if next.is_some() { 50 } else { 0 };

        let mut builder = builder();
        spend(&mut builder, &self.ledger, self.account_in, alice.address);
        spend(
            &mut builder,
            &self.ledger,
            self.foundry_in,
            Address::account(ACCOUNT),
        );
        builder.add_output(
            AccountOutputBuilder::from_previous(account, &self.account_in)
                .with_amount(1_050 - released - kept)
                .next_state()
                .build()
                .unwrap(),
        );
        if let Some(next) = next {
            builder.add_output(next);
        }
        for output in outputs {
            builder.add_output(output);
        }
        let tx = sign(builder, &[&alice]);
        validate_tx(&tx, &self.ledger)
    }
}

/// The foundry mints more tokens through the account.
#[test]
fn test_foundry_mints_more() {
    let foundry = new_foundry(0, 50);
    let minting = Minting::new(foundry.clone());

    let minted = FoundryOutputBuilder::from_previous(&foundry)
        .with_token_scheme(scheme(80, 0))
        .build()
        .unwrap();
    assert_eq!(minting.run(Some(minted), vec![holding(50, 0, 30)]), Ok(()));

    let short = FoundryOutputBuilder::from_previous(&foundry)
        .with_token_scheme(scheme(70, 0))
        .build()
        .unwrap();
    let (_, error) = chain_error(
        minting
            .run(Some(short), vec![holding(50, 0, 30)])
            .unwrap_err(),
    );
    assert_eq!(
        error,
        ChainTransitionError::TokenScheme(TokenSchemeError::MintMismatch {
            counter: U256::from(20u64),
            tokens: U256::from(30u64)
        })
    );
}

/// A foundry can only be destroyed once its supply is gone.
#[test]
fn test_foundry_destroy() {
    let drained = Minting::new(
        FoundryOutputBuilder::new(50, ACCOUNT, 0, scheme(50, 50))
            .build()
            .unwrap(),
    );
    assert_eq!(drained.run(None, vec![]), Ok(()));

    let outstanding = Minting::new(new_foundry(0, 50));
    let (_, error) = chain_error(outstanding.run(None, vec![]).unwrap_err());
    assert_eq!(
        error,
        ChainTransitionError::TokenScheme(TokenSchemeError::OutstandingSupply(U256::from(50u64)))
    );
}

/// Immutable features of a foundry are fixed.
#[test]
fn test_foundry_immutable_features() {
    let foundry = new_foundry(0, 0);
    let minting = Minting::new(foundry.clone());
    let mut changed = foundry;
    changed.immutable_features =
        Features::from_vec(vec![Feature::Metadata(
            MetadataFeature::single("name", *b"coin"),
        )])
        .unwrap();
    let (_, error) = chain_error(minting.run(Some(changed), vec![]).unwrap_err());
    assert_eq!(error, ChainTransitionError::ImmutableFeaturesChanged);
}

/// A new NFT's issuer must be unlocked by the transaction.
#[test]
fn test_nft_genesis_issuer() {
    let (alice, bob) = (alice(), bob());
    let mut ledger = TestLedger::new();
    let funds = ledger.add(basic_output(1_000, alice.address), 1);

    let mint = |issuer: Address| {
        let mut builder = builder();
        spend(&mut builder, &ledger, funds, alice.address);
        builder.add_output(
            NftOutputBuilder::new(1_000, bob.address)
                .add_immutable_feature(Feature::Issuer(IssuerFeature { address: issuer }))
                .build()
                .unwrap(),
        );
        validate_tx(&sign(builder, &[&alice]), &ledger)
    };

    assert_eq!(mint(alice.address), Ok(()));
    let (chain, error) = chain_error(mint(bob.address).unwrap_err());
    assert_matches!(chain, ChainId::Nft(_));
    assert_eq!(error, ChainTransitionError::IssuerNotUnlocked(bob.address));
}

/// An NFT changes hands and unlocks the funds it owns.
#[test]
fn test_nft_transfer_with_owned_funds() {
    let (alice, bob) = (alice(), bob());
    let mut ledger = TestLedger::new();
    let nft = nft_output(500, NFT, alice.address);
    let nft_in = ledger.add(nft.clone(), 1);
    let funds = ledger.add(basic_output(300, Address::nft(NFT)), 1);

    let mut builder = builder();
    spend(&mut builder, &ledger, nft_in, alice.address);
    spend(&mut builder, &ledger, funds, Address::nft(NFT));
    builder
        .add_output(
            NftOutputBuilder::from_previous(&nft, &nft_in)
                .with_owner(bob.address)
                .build()
                .unwrap(),
        )
        .add_output(basic_output(300, alice.address));
    assert_eq!(validate_tx(&sign(builder, &[&alice]), &ledger), Ok(()));
}

/// Immutable features of an NFT are fixed.
#[test]
fn test_nft_immutable_features() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let nft = nft_output(500, NFT, alice.address);
    let nft_in = ledger.add(nft.clone(), 1);

    let mut changed = nft;
    changed.immutable_features = Features::from_vec(vec![
        Feature::Issuer(IssuerFeature {
            address: alice.address,
        }),
    ])
    .unwrap();
    let mut builder = builder();
    spend(&mut builder, &ledger, nft_in, alice.address);
    builder.add_output(changed);
    let (chain, error) =
        chain_error(validate_tx(&sign(builder, &[&alice]), &ledger).unwrap_err());
    assert_eq!(chain, ChainId::Nft(NFT));
    assert_eq!(error, ChainTransitionError::ImmutableFeaturesChanged);
}

/// Burning an NFT is always allowed to its owner.
#[test]
fn test_nft_destroy() {
    let alice = alice();
    let mut ledger = TestLedger::new();
    let nft_in = ledger.add(nft_output(500, NFT, alice.address), 1);

    let mut builder = builder();
    spend(&mut builder, &ledger, nft_in, alice.address);
    builder.add_output(basic_output(500, alice.address));
    assert_eq!(validate_tx(&sign(builder, &[&alice]), &ledger), Ok(()));
}
