// Copyright (c) 2024 Botho Foundation

use super::*;
use crate::{
    address::{AccountAddress, Address, Ed25519Address},
    feature::{
        BlockIssuerFeature, BlockIssuerKey, Feature, IssuerFeature, MetadataFeature,
        SenderFeature, StakingFeature, TagFeature,
    },
    ids::{AccountId, DelegationId, NftId},
    token_scheme::{SimpleTokenScheme, TokenScheme},
    unlock_condition::UnlockCondition,
};
use assert_matches::assert_matches;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn alice() -> Address {
    Address::Ed25519(Ed25519Address([0xa1; 32]))
}

fn params() -> ProtocolParameters {
    ProtocolParameters::default()
}

fn conditions(conditions: Vec<UnlockCondition>) -> UnlockConditions {
    UnlockConditions::from_vec(conditions).unwrap()
}

fn features(features: Vec<Feature>) -> Features {
    Features::from_vec(features).unwrap()
}

fn basic(amount: BaseToken) -> BasicOutput {
    BasicOutput {
        amount,
        mana: 0,
        native_tokens: NativeTokens::default(),
        unlock_conditions: conditions(vec![UnlockCondition::address(alice())]),
        features: Features::default(),
    }
}

fn account(account_id: AccountId) -> AccountOutput {
    AccountOutput {
        amount: 1_000_000,
        mana: 10,
        native_tokens: NativeTokens::default(),
        account_id,
        state_index: 0,
        state_metadata: vec![],
        foundry_counter: 0,
        unlock_conditions: conditions(vec![
            UnlockCondition::StateControllerAddress(alice()),
            UnlockCondition::GovernorAddress(alice()),
        ]),
        features: Features::default(),
        immutable_features: Features::default(),
    }
}

/// One output of every kind, using every feature and unlock condition kind.
fn sample_outputs() -> Vec<Output> {
    let account_id = AccountId([0xac; 32]);
    let foundry = FoundryOutput {
        amount: 1_000_000,
        mana: 0,
        native_tokens: NativeTokens::default(),
        serial_number: 1,
        token_scheme: TokenScheme::Simple(SimpleTokenScheme::new(100, 0, 1000)),
        unlock_conditions: conditions(vec![UnlockCondition::ImmutableAccountAddress(
            AccountAddress(account_id),
        )]),
        features: features(vec![Feature::Metadata(MetadataFeature::single("name", b"coin".to_vec()))]),
        immutable_features: Features::default(),
    };
    let token_id = foundry.foundry_id().unwrap();

    let basic = BasicOutput {
        amount: 1_000_000,
        mana: 5,
        native_tokens: NativeTokens::from_vec(vec![NativeToken::new(token_id, 50)]).unwrap(),
        unlock_conditions: conditions(vec![
            UnlockCondition::address(alice()),
            UnlockCondition::storage_deposit_return(Address::account(account_id), 1000),
            UnlockCondition::timelock(5),
            UnlockCondition::expiration(Address::account(account_id), 50),
        ]),
        features: features(vec![
            Feature::Sender(SenderFeature { address: alice() }),
            Feature::Tag(TagFeature { tag: b"tag".to_vec() }),
            Feature::NativeToken(NativeToken::new(token_id, 7)),
        ]),
    };

    let mut issuer = account(account_id);
    issuer.state_index = 3;
    issuer.foundry_counter = 1;
    issuer.state_metadata = b"state".to_vec();
    issuer.features = features(vec![
        Feature::BlockIssuer(BlockIssuerFeature {
            keys: BTreeSet::from([BlockIssuerKey::Ed25519PublicKey([1u8; 32])]),
            expiry_slot: 100,
        }),
        Feature::Staking(StakingFeature {
            staked_amount: 500,
            fixed_cost: 1,
            start_epoch: 1,
            end_epoch: 10,
        }),
    ]);
    issuer.immutable_features = features(vec![Feature::Issuer(IssuerFeature { address: alice() })]);

    let nft = NftOutput {
        amount: 1_000_000,
        mana: 0,
        native_tokens: NativeTokens::default(),
        nft_id: NftId([0x4f; 32]),
        unlock_conditions: conditions(vec![UnlockCondition::address(alice())]),
        features: Features::default(),
        immutable_features: features(vec![Feature::Metadata(MetadataFeature::single(
            "uri",
            b"ipfs://x".to_vec(),
        ))]),
    };

    let delegation = DelegationOutput {
        amount: 1_000_000,
        mana: 0,
        delegated_amount: 1_000_000,
        delegation_id: DelegationId::EMPTY,
        validator_id: account_id,
        start_epoch: 1,
        end_epoch: 0,
        unlock_conditions: conditions(vec![UnlockCondition::address(alice())]),
    };

    vec![
        basic.into(),
        issuer.into(),
        foundry.into(),
        nft.into(),
        delegation.into(),
    ]
}

#[test]
fn test_every_variant_round_trips() {
    for output in sample_outputs() {
        let bytes = codec::encode(&output).unwrap();
        assert_eq!(codec::decode::<Output>(&bytes).unwrap(), output);
        let json = codec::to_json(&output).unwrap();
        assert_eq!(codec::from_json::<Output>(&json).unwrap(), output);
    }
}

#[test]
fn test_sample_outputs_are_valid() {
    for output in sample_outputs() {
        assert_eq!(output.syntactic_validate(&params()), Ok(()), "{output:?}");
    }
}

#[test]
fn test_decoding_rejects_duplicate_kinds() {
    let duplicated = vec![UnlockCondition::address(alice()), UnlockCondition::address(alice())];
    let bytes = codec::encode(&duplicated).unwrap();
    assert!(codec::decode::<UnlockConditions>(&bytes).is_err());
}

#[test]
fn test_storage_deposit() {
    let output = Output::from(basic(1));
    let required = output.min_deposit(&params().rent_structure).unwrap();
    assert!(required > 0);
    assert_matches!(
        output.syntactic_validate(&params()),
        Err(SyntaxError::InsufficientStorageDeposit { amount: 1, .. })
    );
    assert!(Output::from(basic(required)).syntactic_validate(&params()).is_ok());

    let free = ProtocolParameters {
        rent_structure: RentStructure {
            vbyte_cost: 0,
            ..Default::default()
        },
        ..params()
    };
    assert_eq!(output.min_deposit(&free.rent_structure), Ok(0));
}

#[test]
fn test_amount_bounded_by_supply() {
    let output = Output::from(basic(params().token_supply + 1));
    assert_matches!(
        output.syntactic_validate(&params()),
        Err(SyntaxError::AmountExceedsSupply { .. })
    );
}

#[test]
fn test_kind_rules() {
    let mut nft_with_block_issuer = sample_outputs()[3].clone();
    if let Output::Nft(nft) = &mut nft_with_block_issuer {
        nft.features.upsert(Feature::Staking(StakingFeature {
            staked_amount: 1,
            fixed_cost: 0,
            start_epoch: 0,
            end_epoch: 1,
        }));
    }
    assert_matches!(
        nft_with_block_issuer.syntactic_validate(&params()),
        Err(SyntaxError::DisallowedFeature {
            output: OutputKind::Nft,
            feature: FeatureKind::Staking,
        })
    );

    let mut account_without_governor = account(AccountId::EMPTY);
    account_without_governor.unlock_conditions =
        conditions(vec![UnlockCondition::StateControllerAddress(alice())]);
    assert_matches!(
        Output::from(account_without_governor).syntactic_validate(&params()),
        Err(SyntaxError::MissingUnlockCondition {
            condition: UnlockConditionKind::GovernorAddress,
            ..
        })
    );

    let mut basic_with_governor = basic(1_000_000);
    basic_with_governor.unlock_conditions = conditions(vec![
        UnlockCondition::address(alice()),
        UnlockCondition::GovernorAddress(alice()),
    ]);
    assert_matches!(
        Output::from(basic_with_governor).syntactic_validate(&params()),
        Err(SyntaxError::DisallowedUnlockCondition { .. })
    );
}

#[test]
fn test_chain_self_reference_rejected() {
    let account_id = AccountId([3u8; 32]);
    let mut output = account(account_id);
    output.unlock_conditions = conditions(vec![
        UnlockCondition::StateControllerAddress(Address::account(account_id)),
        UnlockCondition::GovernorAddress(alice()),
    ]);
    assert_matches!(
        Output::from(output).syntactic_validate(&params()),
        Err(SyntaxError::SelfReferencingChain(_))
    );

    let mut new_account = account(AccountId::EMPTY);
    new_account.state_index = 1;
    assert_matches!(
        Output::from(new_account).syntactic_validate(&params()),
        Err(SyntaxError::NewAccountWithState)
    );
}

#[test]
fn test_simple_transfer() {
    assert!(basic(10).is_simple_transfer());
    let mut tagged = basic(10);
    tagged.features = features(vec![Feature::Tag(TagFeature { tag: b"x".to_vec() })]);
    assert!(!tagged.is_simple_transfer());
}

#[test]
fn test_chain_ids() {
    let outputs = sample_outputs();
    let output_id = OutputId::new(crate::ids::TransactionId([9u8; 32]), 0);
    let new_account = Output::from(account(AccountId::EMPTY));
    assert_eq!(
        new_account.resolved_chain_id(&output_id),
        Some(ChainId::Account(AccountId::from_output_id(&output_id)))
    );
    assert_eq!(outputs[0].chain_id(), None);
    assert!(matches!(outputs[2].chain_id(), Some(ChainId::Foundry(_))));
    assert_eq!(outputs[4].chain_id(), None);
}

#[test]
fn test_all_native_tokens_include_feature() {
    let outputs = sample_outputs();
    assert_eq!(outputs[0].all_native_tokens().count(), 2);
    assert_eq!(outputs[1].all_native_tokens().count(), 0);
}

#[test]
fn test_work_score() {
    let structure = WorkScoreStructure::default();
    let outputs = sample_outputs();
    // output + one listed native token + native token feature
    assert_eq!(outputs[0].work_score(&structure), Ok(WorkScore(1 + 2 + 2)));
    // output + block issuer + staking
    assert_eq!(outputs[1].work_score(&structure), Ok(WorkScore(1 + 2 + 2)));
}

proptest! {
    #[test]
    fn basic_outputs_round_trip(amount in any::<u64>(), mana in any::<u64>(), slot in 1u64..u64::MAX) {
        let mut output = basic(amount);
        output.mana = mana;
        output.unlock_conditions = conditions(vec![
            UnlockCondition::address(alice()),
            UnlockCondition::timelock(slot),
        ]);
        let output = Output::from(output);
        let bytes = codec::encode(&output).unwrap();
        prop_assert_eq!(codec::decode::<Output>(&bytes).unwrap(), output);
    }
}
