// Copyright (c) 2024 Botho Foundation

//! Conversions between unix time, slots and epochs.

use crate::amount::{EpochIndex, SlotIndex};

/// Maps wall-clock time onto slots and slots onto epochs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeProvider {
    genesis_unix_timestamp: i64,
    slot_duration_in_seconds: u8,
    slots_per_epoch_exponent: u8,
}

impl TimeProvider {
    /// Create a time provider.
    pub fn new(
        genesis_unix_timestamp: i64,
        slot_duration_in_seconds: u8,
        slots_per_epoch_exponent: u8,
    ) -> Self {
        Self {
            genesis_unix_timestamp,
            slot_duration_in_seconds,
            slots_per_epoch_exponent,
        }
    }

    /// Number of slots in an epoch.
    pub fn slots_per_epoch(&self) -> u64 {
        1u64.checked_shl(u32::from(self.slots_per_epoch_exponent))
            .unwrap_or(u64::MAX)
    }

    /// The slot containing `unix_timestamp`. Times before genesis map to slot 0,
    /// the genesis slot; slot 1 starts at genesis.
    pub fn slot_from_unix_timestamp(&self, unix_timestamp: i64) -> SlotIndex {
        if unix_timestamp < self.genesis_unix_timestamp || self.slot_duration_in_seconds == 0 {
            return 0;
        }
        let elapsed = unix_timestamp.abs_diff(self.genesis_unix_timestamp);
        elapsed / u64::from(self.slot_duration_in_seconds) + 1
    }

    /// The epoch containing `slot`.
    pub fn epoch_from_slot(&self, slot: SlotIndex) -> EpochIndex {
        slot.checked_shr(u32::from(self.slots_per_epoch_exponent))
            .unwrap_or(0)
    }

    /// First slot of `epoch`.
    pub fn epoch_start(&self, epoch: EpochIndex) -> SlotIndex {
        epoch.saturating_mul(self.slots_per_epoch())
    }

    /// Last slot of `epoch`.
    pub fn epoch_end(&self, epoch: EpochIndex) -> SlotIndex {
        self.epoch_start(epoch.saturating_add(1)).saturating_sub(1)
    }

    /// Slots from `slot` (inclusive) up to the start of the next epoch.
    pub fn slots_before_next_epoch(&self, slot: SlotIndex) -> u64 {
        self.epoch_end(self.epoch_from_slot(slot)) - slot + 1
    }

    /// Slots from the start of `slot`'s epoch up to `slot` (exclusive).
    pub fn slots_since_epoch_start(&self, slot: SlotIndex) -> u64 {
        slot - self.epoch_start(self.epoch_from_slot(slot))
    }
}
