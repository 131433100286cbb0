// Copyright (c) 2024 Botho Foundation

//! Mana decay and potential mana generation.
//!
//! Mana held in an output decays once per epoch boundary crossed. Base tokens
//! held in an output generate "potential" mana every slot, which decays the
//! same way once generated.
//!
//! # Fixed point
//!
//! All factors are integers pre-scaled by a power of two. A value `v`
//! multiplied by factor `f` with exponent `e` yields `(v * f) >> e`, computed
//! in 128 bits so the product itself can never wrap; a result that does not
//! fit back into 64 bits is reported as an overflow.
//!
//! # Decay table
//!
//! `decay_factors[i]` is the factor applied after `i + 1` whole epochs. Longer
//! intervals are decayed by repeatedly applying the last entry.

use crate::{
    amount::{
        safe_add, safe_mul, safe_sub, ArithmeticError, BaseToken, EpochIndex, Mana, SlotIndex,
    },
    time::TimeProvider,
};
use displaydoc::Display;

/// Errors from mana computations.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ManaError {
    /// Creation epoch {created} is after target epoch {target}
    WrongEpochIndex {
        /// Epoch the value was created in.
        created: EpochIndex,
        /// Epoch the value is computed for.
        target: EpochIndex,
    },

    /// Arithmetic: {0}
    Arithmetic(ArithmeticError),

    /// Exponents {0} do not describe a valid fixed-point shift
    InvalidShift(&'static str),
}

impl std::error::Error for ManaError {}

impl From<ArithmeticError> for ManaError {
    fn from(src: ArithmeticError) -> Self {
        Self::Arithmetic(src)
    }
}

/// Computes decayed stored mana and generated potential mana.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManaDecayProvider {
    time_provider: TimeProvider,
    slots_per_epoch_exponent: u8,
    generation_rate: u64,
    generation_rate_exponent: u8,
    decay_factors: Vec<u64>,
    decay_factors_exponent: u8,
    decay_factor_epochs_sum: u64,
    decay_factor_epochs_sum_exponent: u8,
}

/// `(value * factor) >> shift` in 128 bits.
fn multiply_and_shift(
    value: u64,
    factor: u64,
    shift: u8,
    what: &'static str,
) -> Result<u64, ManaError> {
    let product = u128::from(value) * u128::from(factor);
    let shifted = product
        .checked_shr(u32::from(shift))
        .ok_or(ManaError::InvalidShift(what))?;
    u64::try_from(shifted).map_err(|_| ManaError::Arithmetic(ArithmeticError::Overflow(what)))
}

impl ManaDecayProvider {
    /// Create a provider.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time_provider: TimeProvider,
        slots_per_epoch_exponent: u8,
        generation_rate: u8,
        generation_rate_exponent: u8,
        decay_factors: &[u32],
        decay_factors_exponent: u8,
        decay_factor_epochs_sum: u32,
        decay_factor_epochs_sum_exponent: u8,
    ) -> Self {
        Self {
            time_provider,
            slots_per_epoch_exponent,
            generation_rate: u64::from(generation_rate),
            generation_rate_exponent,
            decay_factors: decay_factors.iter().copied().map(u64::from).collect(),
            decay_factors_exponent,
            decay_factor_epochs_sum: u64::from(decay_factor_epochs_sum),
            decay_factor_epochs_sum_exponent,
        }
    }

    /// Decay `value` over `epoch_diff` whole epochs.
    pub fn decay(&self, value: Mana, epoch_diff: EpochIndex) -> Result<Mana, ManaError> {
        if value == 0 || epoch_diff == 0 || self.decay_factors.is_empty() {
            return Ok(value);
        }
        let table_len = self.decay_factors.len() as u64;
        let mut value = value;
        let mut remaining = epoch_diff;
        while remaining > 0 && value > 0 {
            let step = remaining.min(table_len);
            remaining -= step;
            // step is in 1..=table_len
            let factor = self.decay_factors[(step - 1) as usize];
            value = multiply_and_shift(value, factor, self.decay_factors_exponent, "mana decay")?;
        }
        Ok(value)
    }

    /// Mana generated by holding `amount` for `slot_diff` slots, without decay.
    pub fn generate_mana(&self, amount: BaseToken, slot_diff: u64) -> Result<Mana, ManaError> {
        if slot_diff == 0 || self.generation_rate == 0 {
            return Ok(0);
        }
        let rate = safe_mul(slot_diff, self.generation_rate, "mana generation rate")?;
        multiply_and_shift(amount, rate, self.generation_rate_exponent, "mana generation")
    }

    /// Stored mana created in `created` as seen in `target`.
    pub fn stored_mana_with_decay(
        &self,
        stored_mana: Mana,
        created: SlotIndex,
        target: SlotIndex,
    ) -> Result<Mana, ManaError> {
        let (created_epoch, target_epoch) = self.epochs(created, target)?;
        self.decay(stored_mana, target_epoch - created_epoch)
    }

    /// Potential mana generated by `amount` from `created` until `target`,
    /// with the decay each portion has undergone by `target`.
    pub fn potential_mana_with_decay(
        &self,
        amount: BaseToken,
        created: SlotIndex,
        target: SlotIndex,
    ) -> Result<Mana, ManaError> {
        let (created_epoch, target_epoch) = self.epochs(created, target)?;
        if created >= target {
            return Ok(0);
        }
        let tp = &self.time_provider;
        match target_epoch - created_epoch {
            0 => self.generate_mana(amount, target - created),
            1 => {
                let first = self.generate_mana(amount, tp.slots_before_next_epoch(created))?;
                let decayed = self.decay(first, 1)?;
                let generated = self.generate_mana(amount, tp.slots_since_epoch_start(target))?;
                Ok(safe_add(decayed, generated, "potential mana")?)
            }
            epoch_diff => {
                // One full epoch of generation times the sum of all later
                // decay factors.
                let shift = self
                    .decay_factor_epochs_sum_exponent
                    .checked_add(self.generation_rate_exponent)
                    .and_then(|shift| shift.checked_sub(self.slots_per_epoch_exponent))
                    .ok_or(ManaError::InvalidShift("potential mana series"))?;
                let series_factor = safe_mul(
                    self.decay_factor_epochs_sum,
                    self.generation_rate,
                    "potential mana series",
                )?;
                let c = multiply_and_shift(amount, series_factor, shift, "potential mana series")?;

                let first = self.generate_mana(amount, tp.slots_before_next_epoch(created))?;
                let first_decayed = self.decay(first, epoch_diff)?;
                let tail = self.decay(c, epoch_diff - 1)?;
                let last = self.generate_mana(amount, tp.slots_since_epoch_start(target))?;
                // Full epochs in between contribute c - decay(c, epoch_diff - 1).
                let total = safe_add(
                    safe_add(c, first_decayed, "potential mana")?,
                    last,
                    "potential mana",
                )?;
                Ok(safe_sub(total, tail, "potential mana")?)
            }
        }
    }

    fn epochs(
        &self,
        created: SlotIndex,
        target: SlotIndex,
    ) -> Result<(EpochIndex, EpochIndex), ManaError> {
        let created_epoch = self.time_provider.epoch_from_slot(created);
        let target_epoch = self.time_provider.epoch_from_slot(target);
        if created_epoch > target_epoch {
            return Err(ManaError::WrongEpochIndex {
                created: created_epoch,
                target: target_epoch,
            });
        }
        Ok((created_epoch, target_epoch))
    }
}
