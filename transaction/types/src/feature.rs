// Copyright (c) 2024 Botho Foundation

//! Output features.

use crate::{
    address::Address,
    amount::{ArithmeticError, BaseToken, EpochIndex, SlotIndex},
    constants::{MAX_BLOCK_ISSUER_KEYS, MAX_METADATA_LENGTH, MAX_TAG_LENGTH, MIN_BLOCK_ISSUER_KEYS},
    error::SyntaxError,
    native_token::NativeToken,
    work_score::{WorkScore, WorkScoreStructure},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Feature kinds, ordered by their kind byte.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum FeatureKind {
    /// [SenderFeature]
    Sender = 0,
    /// [IssuerFeature]
    Issuer = 1,
    /// [MetadataFeature]
    Metadata = 2,
    /// [TagFeature]
    Tag = 4,
    /// [NativeToken] held as a feature.
    NativeToken = 5,
    /// [BlockIssuerFeature]
    BlockIssuer = 6,
    /// [StakingFeature]
    Staking = 7,
}

/// Names the address that sent an output. That address must be unlocked
/// by the transaction creating the output.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SenderFeature {
    /// The sender.
    pub address: Address,
}

/// Names the issuer of a chain output. Only valid as an immutable feature,
/// checked against the unlocked addresses at genesis.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct IssuerFeature {
    /// The issuer.
    pub address: Address,
}

/// Arbitrary key/value metadata. Keys are printable ASCII.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct MetadataFeature {
    /// Entries sorted by key.
    pub entries: BTreeMap<String, Vec<u8>>,
}

impl MetadataFeature {
    /// Metadata with a single entry.
    pub fn single(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }

    fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        if self.entries.is_empty() {
            return Err(SyntaxError::InvalidMetadata("no entries"));
        }
        let mut size = 0usize;
        for (key, value) in &self.entries {
            if key.is_empty() || !key.bytes().all(|byte| (0x20..=0x7e).contains(&byte)) {
                return Err(SyntaxError::InvalidMetadata("key is not printable ASCII"));
            }
            size = size.saturating_add(key.len()).saturating_add(value.len());
        }
        if size > MAX_METADATA_LENGTH {
            return Err(SyntaxError::InvalidMetadata("entries too large"));
        }
        Ok(())
    }
}

/// An indexation tag.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TagFeature {
    /// Between 1 and 64 bytes.
    pub tag: Vec<u8>,
}

/// A key allowed to sign blocks on behalf of an account.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum BlockIssuerKey {
    /// Raw Ed25519 public key bytes.
    Ed25519PublicKey([u8; 32]),
}

/// Allows an account to issue blocks until `expiry_slot`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct BlockIssuerFeature {
    /// Keys allowed to issue blocks.
    pub keys: BTreeSet<BlockIssuerKey>,
    /// Last slot the feature is valid in. Zero means it never expires.
    pub expiry_slot: SlotIndex,
}

impl BlockIssuerFeature {
    /// Whether the feature has expired by `slot`.
    pub fn is_expired(&self, slot: SlotIndex) -> bool {
        self.expiry_slot != 0 && self.expiry_slot < slot
    }
}

/// Stakes part of an account's tokens towards a validator role.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct StakingFeature {
    /// Base tokens staked.
    pub staked_amount: BaseToken,
    /// Fixed mana cost charged per epoch.
    pub fixed_cost: u64,
    /// First epoch of staking.
    pub start_epoch: EpochIndex,
    /// Last epoch of staking.
    pub end_epoch: EpochIndex,
}

/// A feature of an output.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    /// Sender.
    Sender(SenderFeature),
    /// Issuer.
    Issuer(IssuerFeature),
    /// Metadata.
    Metadata(MetadataFeature),
    /// Tag.
    Tag(TagFeature),
    /// Native token.
    NativeToken(NativeToken),
    /// Block issuer.
    BlockIssuer(BlockIssuerFeature),
    /// Staking.
    Staking(StakingFeature),
}

impl Feature {
    /// The kind of feature.
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Sender(_) => FeatureKind::Sender,
            Feature::Issuer(_) => FeatureKind::Issuer,
            Feature::Metadata(_) => FeatureKind::Metadata,
            Feature::Tag(_) => FeatureKind::Tag,
            Feature::NativeToken(_) => FeatureKind::NativeToken,
            Feature::BlockIssuer(_) => FeatureKind::BlockIssuer,
            Feature::Staking(_) => FeatureKind::Staking,
        }
    }

    /// Check the feature's own content.
    pub fn syntactic_validate(&self) -> Result<(), SyntaxError> {
        match self {
            Feature::Sender(_) | Feature::Issuer(_) => Ok(()),
            Feature::Metadata(metadata) => metadata.syntactic_validate(),
            Feature::Tag(tag) => {
                if tag.tag.is_empty() || tag.tag.len() > MAX_TAG_LENGTH {
                    return Err(SyntaxError::InvalidTag(tag.tag.len()));
                }
                Ok(())
            }
            Feature::NativeToken(token) => {
                if token.amount.is_zero() {
                    return Err(SyntaxError::ZeroNativeTokenAmount(token.id));
                }
                Ok(())
            }
            Feature::BlockIssuer(block_issuer) => {
                let count = block_issuer.keys.len();
                if !(MIN_BLOCK_ISSUER_KEYS..=MAX_BLOCK_ISSUER_KEYS).contains(&count) {
                    return Err(SyntaxError::InvalidBlockIssuerKeyCount(count));
                }
                Ok(())
            }
            Feature::Staking(staking) => {
                if staking.start_epoch >= staking.end_epoch {
                    return Err(SyntaxError::InvalidStakingEpochs {
                        start: staking.start_epoch,
                        end: staking.end_epoch,
                    });
                }
                Ok(())
            }
        }
    }

    /// Work score charged for this feature.
    pub fn work_score(&self, structure: &WorkScoreStructure) -> WorkScore {
        match self {
            Feature::NativeToken(_) => structure.native_token,
            Feature::BlockIssuer(_) => structure.block_issuer,
            Feature::Staking(_) => structure.staking,
            _ => WorkScore::default(),
        }
    }
}

/// A set of features, unique by kind and kept sorted by kind.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Feature>", into = "Vec<Feature>")]
pub struct Features(Vec<Feature>);

impl Features {
    /// No features.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Sort by kind and reject duplicate kinds or invalid features.
    pub fn from_vec(mut features: Vec<Feature>) -> Result<Self, SyntaxError> {
        features.sort_by_key(Feature::kind);
        for pair in features.windows(2) {
            if pair[0].kind() == pair[1].kind() {
                return Err(SyntaxError::DuplicateFeature(pair[0].kind()));
            }
        }
        for feature in &features {
            feature.syntactic_validate()?;
        }
        Ok(Self(features))
    }

    /// Insert or replace the feature of the same kind.
    pub fn upsert(&mut self, feature: Feature) {
        match self.0.binary_search_by_key(&feature.kind(), Feature::kind) {
            Ok(index) => self.0[index] = feature,
            Err(index) => self.0.insert(index, feature),
        }
    }

    /// Remove the feature of `kind`, returning it.
    pub fn remove(&mut self, kind: FeatureKind) -> Option<Feature> {
        self.0
            .binary_search_by_key(&kind, Feature::kind)
            .ok()
            .map(|index| self.0.remove(index))
    }

    /// The feature of `kind`, if present.
    pub fn get(&self, kind: FeatureKind) -> Option<&Feature> {
        self.0
            .binary_search_by_key(&kind, Feature::kind)
            .ok()
            .map(|index| &self.0[index])
    }

    /// Iterate in kind order.
    pub fn iter(&self) -> core::slice::Iter<'_, Feature> {
        self.0.iter()
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no features.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject any feature whose kind is not in `allowed`.
    pub fn check_allowed(&self, allowed: &[FeatureKind]) -> Result<(), FeatureKind> {
        match self.0.iter().find(|feature| !allowed.contains(&feature.kind())) {
            Some(feature) => Err(feature.kind()),
            None => Ok(()),
        }
    }

    /// Sender feature.
    pub fn sender(&self) -> Option<&SenderFeature> {
        match self.get(FeatureKind::Sender) {
            Some(Feature::Sender(feature)) => Some(feature),
            _ => None,
        }
    }

    /// Issuer feature.
    pub fn issuer(&self) -> Option<&IssuerFeature> {
        match self.get(FeatureKind::Issuer) {
            Some(Feature::Issuer(feature)) => Some(feature),
            _ => None,
        }
    }

    /// Metadata feature.
    pub fn metadata(&self) -> Option<&MetadataFeature> {
        match self.get(FeatureKind::Metadata) {
            Some(Feature::Metadata(feature)) => Some(feature),
            _ => None,
        }
    }

    /// Tag feature.
    pub fn tag(&self) -> Option<&TagFeature> {
        match self.get(FeatureKind::Tag) {
            Some(Feature::Tag(feature)) => Some(feature),
            _ => None,
        }
    }

    /// Native token feature.
    pub fn native_token(&self) -> Option<&NativeToken> {
        match self.get(FeatureKind::NativeToken) {
            Some(Feature::NativeToken(feature)) => Some(feature),
            _ => None,
        }
    }

    /// Block issuer feature.
    pub fn block_issuer(&self) -> Option<&BlockIssuerFeature> {
        match self.get(FeatureKind::BlockIssuer) {
            Some(Feature::BlockIssuer(feature)) => Some(feature),
            _ => None,
        }
    }

    /// Staking feature.
    pub fn staking(&self) -> Option<&StakingFeature> {
        match self.get(FeatureKind::Staking) {
            Some(Feature::Staking(feature)) => Some(feature),
            _ => None,
        }
    }

    /// Summed work score of all features.
    pub fn work_score(&self, structure: &WorkScoreStructure) -> Result<WorkScore, ArithmeticError> {
        WorkScore::sum(self.0.iter().map(|feature| feature.work_score(structure)))
    }
}

impl TryFrom<Vec<Feature>> for Features {
    type Error = SyntaxError;

    fn try_from(features: Vec<Feature>) -> Result<Self, Self::Error> {
        Self::from_vec(features)
    }
}

impl From<Features> for Vec<Feature> {
    fn from(features: Features) -> Self {
        features.0
    }
}

impl<'a> IntoIterator for &'a Features {
    type Item = &'a Feature;
    type IntoIter = core::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The feature of `kind` must be present on both sides with equal content,
/// or absent on both.
pub fn feature_unchanged(kind: FeatureKind, current: &Features, next: &Features) -> bool {
    current.get(kind) == next.get(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Ed25519Address;
    use assert_matches::assert_matches;

    fn sender() -> Feature {
        Feature::Sender(SenderFeature {
            address: Address::Ed25519(Ed25519Address([1u8; 32])),
        })
    }

    fn tag(bytes: &[u8]) -> Feature {
        Feature::Tag(TagFeature { tag: bytes.to_vec() })
    }

    #[test]
    fn test_features_sorted_by_kind() {
        let features = Features::from_vec(vec![tag(b"t"), sender()]).unwrap();
        let kinds: Vec<_> = features.iter().map(Feature::kind).collect();
        assert_eq!(kinds, vec![FeatureKind::Sender, FeatureKind::Tag]);
        assert!(features.sender().is_some());
        assert_eq!(features.tag().map(|t| t.tag.as_slice()), Some(&b"t"[..]));
        assert!(features.metadata().is_none());
    }

    #[test]
    fn test_duplicate_kinds_rejected() {
        assert_matches!(
            Features::from_vec(vec![tag(b"a"), tag(b"b")]),
            Err(SyntaxError::DuplicateFeature(FeatureKind::Tag))
        );
    }

    #[test]
    fn test_feature_content_rules() {
        assert_matches!(Features::from_vec(vec![tag(b"")]), Err(SyntaxError::InvalidTag(0)));
        assert_matches!(
            Features::from_vec(vec![tag(&[0u8; MAX_TAG_LENGTH + 1])]),
            Err(SyntaxError::InvalidTag(_))
        );
        let metadata = Feature::Metadata(MetadataFeature::single("bad\nkey", b"v".to_vec()));
        assert_matches!(Features::from_vec(vec![metadata]), Err(SyntaxError::InvalidMetadata(_)));
        let block_issuer = Feature::BlockIssuer(BlockIssuerFeature {
            keys: BTreeSet::new(),
            expiry_slot: 0,
        });
        assert_matches!(
            Features::from_vec(vec![block_issuer]),
            Err(SyntaxError::InvalidBlockIssuerKeyCount(0))
        );
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut features = Features::from_vec(vec![tag(b"a")]).unwrap();
        features.upsert(sender());
        features.upsert(tag(b"b"));
        assert_eq!(features.len(), 2);
        assert_eq!(features.tag().map(|t| t.tag.clone()), Some(b"b".to_vec()));
        assert!(features.remove(FeatureKind::Sender).is_some());
        assert!(features.remove(FeatureKind::Sender).is_none());
    }

    #[test]
    fn test_feature_unchanged() {
        let with_tag = Features::from_vec(vec![tag(b"a")]).unwrap();
        let other_tag = Features::from_vec(vec![tag(b"b")]).unwrap();
        assert!(feature_unchanged(FeatureKind::Tag, &with_tag, &with_tag.clone()));
        assert!(!feature_unchanged(FeatureKind::Tag, &with_tag, &other_tag));
        assert!(!feature_unchanged(FeatureKind::Tag, &with_tag, &Features::empty()));
        assert!(feature_unchanged(FeatureKind::Metadata, &with_tag, &other_tag));
    }

    #[test]
    fn test_block_issuer_expiry() {
        let feature = BlockIssuerFeature {
            keys: BTreeSet::from([BlockIssuerKey::Ed25519PublicKey([0u8; 32])]),
            expiry_slot: 10,
        };
        assert!(!feature.is_expired(10));
        assert!(feature.is_expired(11));
        let forever = BlockIssuerFeature {
            expiry_slot: 0,
            ..feature
        };
        assert!(!forever.is_expired(u64::MAX));
    }
}
