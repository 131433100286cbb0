// Copyright (c) 2024 Botho Foundation

//! Work score: the computational cost of processing ledger objects.

use crate::amount::ArithmeticError;
use core::{fmt, ops};
use serde::{Deserialize, Serialize};

/// Cost units of work. Arithmetic is checked.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct WorkScore(pub u32);

impl WorkScore {
    /// `self + other`.
    pub fn add(self, other: WorkScore) -> Result<WorkScore, ArithmeticError> {
        self.0
            .checked_add(other.0)
            .map(WorkScore)
            .ok_or(ArithmeticError::Overflow("work score"))
    }

    /// `self * factor`.
    pub fn multiply(self, factor: usize) -> Result<WorkScore, ArithmeticError> {
        u32::try_from(factor)
            .ok()
            .and_then(|factor| self.0.checked_mul(factor))
            .map(WorkScore)
            .ok_or(ArithmeticError::Overflow("work score"))
    }

    /// Sum several scores.
    pub fn sum(scores: impl IntoIterator<Item = WorkScore>) -> Result<WorkScore, ArithmeticError> {
        scores
            .into_iter()
            .try_fold(WorkScore::default(), WorkScore::add)
    }
}

impl From<u32> for WorkScore {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl ops::Deref for WorkScore {
    type Target = u32;

    fn deref(&self) -> &u32 {
        &self.0
    }
}

impl fmt::Display for WorkScore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-item work score weights.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WorkScoreStructure {
    /// Charged per kibibyte of block data.
    pub data_kibibyte: WorkScore,
    /// Charged per block.
    pub block: WorkScore,
    /// Charged per missing strong parent below the threshold.
    pub missing_parent: WorkScore,
    /// Charged per input.
    pub input: WorkScore,
    /// Charged per context input.
    pub context_input: WorkScore,
    /// Charged per output.
    pub output: WorkScore,
    /// Charged per native token.
    pub native_token: WorkScore,
    /// Charged per staking feature.
    pub staking: WorkScore,
    /// Charged per block issuer feature.
    pub block_issuer: WorkScore,
    /// Charged per allotment.
    pub allotment: WorkScore,
    /// Charged per Ed25519 signature.
    pub signature_ed25519: WorkScore,
    /// Strong parents a block needs to avoid the missing-parent charge.
    pub min_strong_parents_threshold: u8,
}

impl Default for WorkScoreStructure {
    fn default() -> Self {
        Self {
            data_kibibyte: WorkScore(1),
            block: WorkScore(1),
            missing_parent: WorkScore(1),
            input: WorkScore(10),
            context_input: WorkScore(5),
            output: WorkScore(1),
            native_token: WorkScore(2),
            staking: WorkScore(2),
            block_issuer: WorkScore(2),
            allotment: WorkScore(10),
            signature_ed25519: WorkScore(4),
            min_strong_parents_threshold: 4,
        }
    }
}

impl WorkScoreStructure {
    /// Largest work score a single block may have.
    pub fn max_block_work(&self) -> Result<WorkScore, ArithmeticError> {
        use crate::constants::{MAX_ALLOTMENTS, MAX_CONTEXT_INPUTS, MAX_INPUTS, MAX_OUTPUTS};

        // 32 KiB of block data.
        let mut max = self.block.add(self.data_kibibyte.multiply(32)?)?;
        let missing_parents = usize::from(self.min_strong_parents_threshold);
        max = max.add(self.missing_parent.multiply(missing_parents)?)?;
        max = max.add(self.input.multiply(MAX_INPUTS)?)?;
        max = max.add(self.context_input.multiply(MAX_CONTEXT_INPUTS)?)?;
        max = max.add(self.output.multiply(MAX_OUTPUTS)?)?;
        max = max.add(self.allotment.multiply(MAX_ALLOTMENTS)?)?;
        max.add(self.signature_ed25519.multiply(MAX_INPUTS)?)
    }
}
