// Copyright (c) 2024 Botho Foundation

//! Protocol parameters, loadable from TOML.

use crate::{
    amount::{BaseToken, SlotIndex},
    codec,
    error::CodecError,
    hash::blake2b_256,
    ids::Identifier,
    mana::ManaDecayProvider,
    time::TimeProvider,
    work_score::WorkScoreStructure,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

/// Parameters rejected by [ProtocolParameters::validate].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolParametersError {
    /// The network name is empty.
    #[error("network name must not be empty")]
    EmptyNetworkName,

    /// The token supply is zero.
    #[error("token supply must be positive")]
    ZeroTokenSupply,

    /// The slot duration is zero.
    #[error("slot duration must be positive")]
    ZeroSlotDuration,

    /// A fixed-point exponent does not fit a 64-bit shift.
    #[error("{name} exponent {value} must be below 64")]
    ExponentTooLarge {
        /// Which exponent.
        name: &'static str,
        /// Its value.
        value: u8,
    },

    /// A decay factor would grow mana.
    #[error("mana decay factor at index {index} exceeds 1.0")]
    GrowingDecayFactor {
        /// Position in the decay table.
        index: usize,
    },
}

/// Bytes-to-deposit conversion of the storage deposit.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RentStructure {
    /// Base tokens per virtual byte.
    #[serde(default = "default_vbyte_cost")]
    pub vbyte_cost: u32,
    /// Weight of data bytes.
    #[serde(default = "default_vbyte_factor_data")]
    pub vbyte_factor_data: u8,
    /// Weight of key bytes.
    #[serde(default = "default_vbyte_factor_key")]
    pub vbyte_factor_key: u8,
}

impl Default for RentStructure {
    fn default() -> Self {
        Self {
            vbyte_cost: default_vbyte_cost(),
            vbyte_factor_data: default_vbyte_factor_data(),
            vbyte_factor_key: default_vbyte_factor_key(),
        }
    }
}

fn default_vbyte_cost() -> u32 {
    100
}

fn default_vbyte_factor_data() -> u8 {
    1
}

fn default_vbyte_factor_key() -> u8 {
    10
}

/// Parameters every node on a network agrees on.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProtocolParameters {
    /// Protocol version.
    #[serde(default = "default_version")]
    pub version: u8,

    /// Network name; hashed into the network id.
    #[serde(default = "default_network_name")]
    pub network_name: String,

    /// Human readable part of bech32 addresses.
    #[serde(default = "default_bech32_hrp")]
    pub bech32_hrp: String,

    /// Storage deposit parameters.
    #[serde(default)]
    pub rent_structure: RentStructure,

    /// Work score weights.
    #[serde(default)]
    pub work_score_structure: WorkScoreStructure,

    /// Total base tokens in existence.
    #[serde(default = "default_token_supply")]
    pub token_supply: BaseToken,

    /// Unix time of the genesis slot's end.
    #[serde(default)]
    pub genesis_unix_timestamp: i64,

    /// Length of a slot.
    #[serde(default = "default_slot_duration_in_seconds")]
    pub slot_duration_in_seconds: u8,

    /// log2 of slots per epoch.
    #[serde(default = "default_slots_per_epoch_exponent")]
    pub slots_per_epoch_exponent: u8,

    /// Mana generated per base token per slot, scaled by the exponent below.
    #[serde(default = "default_mana_generation_rate")]
    pub mana_generation_rate: u8,

    /// Scaling exponent of the generation rate.
    #[serde(default = "default_mana_generation_rate_exponent")]
    pub mana_generation_rate_exponent: u8,

    /// Decay factor after `i + 1` epochs at index `i`.
    #[serde(default = "default_mana_decay_factors")]
    pub mana_decay_factors: Vec<u32>,

    /// Scaling exponent of the decay factors.
    #[serde(default = "default_mana_decay_factors_exponent")]
    pub mana_decay_factors_exponent: u8,

    /// Sum of decay factors over all future epochs.
    #[serde(default = "default_mana_decay_factor_epochs_sum")]
    pub mana_decay_factor_epochs_sum: u32,

    /// Scaling exponent of the decay factor sum.
    #[serde(default = "default_mana_decay_factor_epochs_sum_exponent")]
    pub mana_decay_factor_epochs_sum_exponent: u8,

    /// Epochs staked tokens stay bonded after staking ends.
    #[serde(default = "default_staking_unbonding_period")]
    pub staking_unbonding_period: u64,

    /// Slots after which a slot is no longer mutable.
    #[serde(default = "default_eviction_age")]
    pub eviction_age: SlotIndex,

    /// Minimum slot distance between now and a block issuer expiry.
    #[serde(default = "default_liveness_threshold")]
    pub liveness_threshold: SlotIndex,

    /// Slots before an epoch's end at which the next committee is chosen.
    #[serde(default = "default_epoch_nearing_threshold")]
    pub epoch_nearing_threshold: SlotIndex,
}

fn default_version() -> u8 {
    3
}

fn default_network_name() -> String {
    "testnet".to_string()
}

fn default_bech32_hrp() -> String {
    "rms".to_string()
}

fn default_token_supply() -> BaseToken {
    1_813_620_509_061_365
}

fn default_slot_duration_in_seconds() -> u8 {
    10
}

fn default_slots_per_epoch_exponent() -> u8 {
    13
}

fn default_mana_generation_rate() -> u8 {
    1
}

fn default_mana_generation_rate_exponent() -> u8 {
    17
}

// Per-epoch decay of roughly 0.1%, scaled by 2^32.
fn default_mana_decay_factors() -> Vec<u32> {
    vec![
        4_290_672_328,
        4_286_381_656,
        4_282_095_274,
        4_277_813_179,
        4_273_535_366,
        4_269_261_830,
        4_264_992_569,
        4_260_727_576,
    ]
}

fn default_mana_decay_factors_exponent() -> u8 {
    32
}

fn default_mana_decay_factor_epochs_sum() -> u32 {
    1_047_527_423
}

fn default_mana_decay_factor_epochs_sum_exponent() -> u8 {
    20
}

fn default_staking_unbonding_period() -> u64 {
    10
}

fn default_eviction_age() -> SlotIndex {
    6
}

fn default_liveness_threshold() -> SlotIndex {
    3
}

fn default_epoch_nearing_threshold() -> SlotIndex {
    4
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            version: default_version(),
            network_name: default_network_name(),
            bech32_hrp: default_bech32_hrp(),
            rent_structure: RentStructure::default(),
            work_score_structure: WorkScoreStructure::default(),
            token_supply: default_token_supply(),
            genesis_unix_timestamp: 0,
            slot_duration_in_seconds: default_slot_duration_in_seconds(),
            slots_per_epoch_exponent: default_slots_per_epoch_exponent(),
            mana_generation_rate: default_mana_generation_rate(),
            mana_generation_rate_exponent: default_mana_generation_rate_exponent(),
            mana_decay_factors: default_mana_decay_factors(),
            mana_decay_factors_exponent: default_mana_decay_factors_exponent(),
            mana_decay_factor_epochs_sum: default_mana_decay_factor_epochs_sum(),
            mana_decay_factor_epochs_sum_exponent: default_mana_decay_factor_epochs_sum_exponent(),
            staking_unbonding_period: default_staking_unbonding_period(),
            eviction_age: default_eviction_age(),
            liveness_threshold: default_liveness_threshold(),
            epoch_nearing_threshold: default_epoch_nearing_threshold(),
        }
    }
}

impl ProtocolParameters {
    /// Parse and validate parameters from TOML. Missing fields take their
    /// defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let params: Self = toml::from_str(contents).context("Failed to parse protocol parameters")?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("Failed to read protocol parameters from {}", path.display())
        })?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize protocol parameters")
    }

    /// Reject parameters the ledger cannot operate with.
    pub fn validate(&self) -> Result<(), ProtocolParametersError> {
        if self.network_name.is_empty() {
            return Err(ProtocolParametersError::EmptyNetworkName);
        }
        if self.token_supply == 0 {
            return Err(ProtocolParametersError::ZeroTokenSupply);
        }
        if self.slot_duration_in_seconds == 0 {
            return Err(ProtocolParametersError::ZeroSlotDuration);
        }
        for (name, value) in [
            ("slots per epoch", self.slots_per_epoch_exponent),
            ("mana generation rate", self.mana_generation_rate_exponent),
            ("mana decay factors", self.mana_decay_factors_exponent),
            ("mana decay factor epochs sum", self.mana_decay_factor_epochs_sum_exponent),
        ] {
            if value >= 64 {
                return Err(ProtocolParametersError::ExponentTooLarge { name, value });
            }
        }
        let one = 1u64 << self.mana_decay_factors_exponent;
        if let Some(index) = self
            .mana_decay_factors
            .iter()
            .position(|factor| u64::from(*factor) > one)
        {
            return Err(ProtocolParametersError::GrowingDecayFactor { index });
        }
        Ok(())
    }

    /// Network id: the first eight bytes of the network name's hash.
    pub fn network_id(&self) -> u64 {
        let hash = blake2b_256(self.network_name.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Hash of the canonical encoding.
    pub fn hash(&self) -> Result<Identifier, CodecError> {
        codec::hash(self).map(Identifier)
    }

    /// Slot and epoch arithmetic for these parameters.
    pub fn time_provider(&self) -> TimeProvider {
        TimeProvider::new(
            self.genesis_unix_timestamp,
            self.slot_duration_in_seconds,
            self.slots_per_epoch_exponent,
        )
    }

    /// Mana computations for these parameters.
    pub fn mana_decay_provider(&self) -> ManaDecayProvider {
        ManaDecayProvider::new(
            self.time_provider(),
            self.slots_per_epoch_exponent,
            self.mana_generation_rate,
            self.mana_generation_rate_exponent,
            &self.mana_decay_factors,
            self.mana_decay_factors_exponent,
            self.mana_decay_factor_epochs_sum,
            self.mana_decay_factor_epochs_sum_exponent,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let params = ProtocolParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.time_provider().slots_per_epoch(), 8192);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let params = ProtocolParameters::from_toml_str(
            r#"
            network_name = "alphanet"
            liveness_threshold = 12

            [rent_structure]
            vbyte_cost = 0
            "#,
        )
        .unwrap();
        assert_eq!(params.network_name, "alphanet");
        assert_eq!(params.liveness_threshold, 12);
        assert_eq!(params.rent_structure.vbyte_cost, 0);
        assert_eq!(params.rent_structure.vbyte_factor_key, 10);
        assert_eq!(params.token_supply, default_token_supply());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(ProtocolParameters::from_toml_str("token_supply = 0").is_err());
        assert!(ProtocolParameters::from_toml_str("slots_per_epoch_exponent = 64").is_err());
        assert!(ProtocolParameters::from_toml_str("token_supply = \"lots\"").is_err());
    }

    #[test]
    fn test_growing_decay_factor_rejected() {
        let params = ProtocolParameters {
            mana_decay_factors: vec![1 << 20, (1 << 20) + 1],
            mana_decay_factors_exponent: 20,
            ..Default::default()
        };
        assert_matches!(
            params.validate(),
            Err(ProtocolParametersError::GrowingDecayFactor { index: 1 })
        );
    }

    #[test]
    fn test_load_round_trip() {
        let params = ProtocolParameters {
            network_name: "devnet".to_string(),
            ..Default::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(params.to_toml_string().unwrap().as_bytes()).unwrap();
        let loaded = ProtocolParameters::load(file.path()).unwrap();
        assert_eq!(loaded, params);
        assert_eq!(loaded.hash().unwrap(), params.hash().unwrap());
    }

    #[test]
    fn test_network_id_depends_on_name() {
        let a = ProtocolParameters::default();
        let b = ProtocolParameters {
            network_name: "other".to_string(),
            ..Default::default()
        };
        assert_ne!(a.network_id(), b.network_id());
        assert_eq!(a.network_id(), ProtocolParameters::default().network_id());
    }
}
