// Copyright (c) 2024 Botho Foundation

//! Token schemes: supply accounting of the native token a foundry controls.

use crate::{chain::ChainTransitionType, ids::SIMPLE_TOKEN_SCHEME_KIND};
use displaydoc::Display;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Violations of a token scheme's rules.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum TokenSchemeError {
    /// Maximum supply must be greater than zero
    ZeroMaximumSupply,

    /// Melted tokens {melted} exceed minted tokens {minted}
    MeltedExceedsMinted {
        /// Minted counter.
        minted: U256,
        /// Melted counter.
        melted: U256,
    },

    /// Circulating supply exceeds maximum supply {0}
    CirculatingExceedsMaximum(U256),

    /// Melted tokens must be zero at genesis, got {0}
    NonZeroGenesisMelted(U256),

    /// Genesis must mint exactly the output amount: minted {minted}, outputs hold {outputs}
    GenesisMintMismatch {
        /// Minted counter of the new foundry.
        minted: U256,
        /// Tokens held by the transaction's outputs.
        outputs: U256,
    },

    /// Maximum supply changed from {current} to {next}
    MaximumSupplyChanged {
        /// Before.
        current: U256,
        /// After.
        next: U256,
    },

    /// Minted tokens decreased from {current} to {next}
    MintedDecreased {
        /// Before.
        current: U256,
        /// After.
        next: U256,
    },

    /// Melted tokens decreased from {current} to {next}
    MeltedDecreased {
        /// Before.
        current: U256,
        /// After.
        next: U256,
    },

    /// Minted delta {counter} does not match the token increase {tokens}
    MintMismatch {
        /// Increase of the minted counter.
        counter: U256,
        /// Increase of tokens from inputs to outputs.
        tokens: U256,
    },

    /// Melted delta {counter} exceeds the token decrease {tokens}
    MeltExceedsDecrease {
        /// Increase of the melted counter.
        counter: U256,
        /// Decrease of tokens from inputs to outputs.
        tokens: U256,
    },

    /// Minting and melting in the same transition
    MintAndMelt,

    /// Counters changed without a change in token amounts
    CountersChangedWithoutTokenDelta,

    /// Foundry destroyed with {0} tokens still in circulation
    OutstandingSupply(U256),

    /// State change requires the next token scheme
    MissingNextScheme,
}

impl std::error::Error for TokenSchemeError {}

/// A supply-tracking scheme attached to a foundry.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TokenScheme {
    /// Minted/melted/maximum counters.
    Simple(SimpleTokenScheme),
}

impl TokenScheme {
    /// The kind byte embedded in foundry ids.
    pub fn kind(&self) -> u8 {
        match self {
            TokenScheme::Simple(_) => SIMPLE_TOKEN_SCHEME_KIND,
        }
    }

    /// Check the scheme's counters are internally consistent.
    pub fn syntactic_validate(&self) -> Result<(), TokenSchemeError> {
        match self {
            TokenScheme::Simple(scheme) => scheme.syntactic_validate(),
        }
    }

    /// Check a foundry transition against the native token amounts held by
    /// the transaction's inputs and outputs for this foundry's token.
    pub fn state_transition(
        &self,
        transition: ChainTransitionType,
        next: Option<&TokenScheme>,
        in_sum: &U256,
        out_sum: &U256,
    ) -> Result<(), TokenSchemeError> {
        match self {
            TokenScheme::Simple(scheme) => match transition {
                ChainTransitionType::Genesis => scheme.genesis_valid(out_sum),
                ChainTransitionType::StateChange => {
                    let Some(TokenScheme::Simple(next)) = next else {
                        return Err(TokenSchemeError::MissingNextScheme);
                    };
                    scheme.state_change_valid(next, in_sum, out_sum)
                }
                ChainTransitionType::Destroy => scheme.destruction_valid(in_sum, out_sum),
            },
        }
    }
}

/// Tracks how many tokens were minted and melted, bounded by a maximum
/// supply.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SimpleTokenScheme {
    /// Tokens minted so far.
    pub minted_tokens: U256,
    /// Tokens melted so far.
    pub melted_tokens: U256,
    /// Upper bound on circulating supply.
    pub maximum_supply: U256,
}

impl SimpleTokenScheme {
    /// Create a scheme.
    pub fn new(
        minted_tokens: impl Into<U256>,
        melted_tokens: impl Into<U256>,
        maximum_supply: impl Into<U256>,
    ) -> Self {
        Self {
            minted_tokens: minted_tokens.into(),
            melted_tokens: melted_tokens.into(),
            maximum_supply: maximum_supply.into(),
        }
    }

    /// Minted minus melted.
    pub fn circulating_supply(&self) -> U256 {
        self.minted_tokens.saturating_sub(self.melted_tokens)
    }

    fn syntactic_validate(&self) -> Result<(), TokenSchemeError> {
        if self.maximum_supply.is_zero() {
            return Err(TokenSchemeError::ZeroMaximumSupply);
        }
        if self.melted_tokens > self.minted_tokens {
            return Err(TokenSchemeError::MeltedExceedsMinted {
                minted: self.minted_tokens,
                melted: self.melted_tokens,
            });
        }
        if self.circulating_supply() > self.maximum_supply {
            return Err(TokenSchemeError::CirculatingExceedsMaximum(self.maximum_supply));
        }
        Ok(())
    }

    fn genesis_valid(&self, out_sum: &U256) -> Result<(), TokenSchemeError> {
        if !self.melted_tokens.is_zero() {
            return Err(TokenSchemeError::NonZeroGenesisMelted(self.melted_tokens));
        }
        if *out_sum != self.minted_tokens {
            return Err(TokenSchemeError::GenesisMintMismatch {
                minted: self.minted_tokens,
                outputs: *out_sum,
            });
        }
        Ok(())
    }

    fn state_change_valid(
        &self,
        next: &SimpleTokenScheme,
        in_sum: &U256,
        out_sum: &U256,
    ) -> Result<(), TokenSchemeError> {
        if self.maximum_supply != next.maximum_supply {
            return Err(TokenSchemeError::MaximumSupplyChanged {
                current: self.maximum_supply,
                next: next.maximum_supply,
            });
        }
        if next.minted_tokens < self.minted_tokens {
            return Err(TokenSchemeError::MintedDecreased {
                current: self.minted_tokens,
                next: next.minted_tokens,
            });
        }
        if next.melted_tokens < self.melted_tokens {
            return Err(TokenSchemeError::MeltedDecreased {
                current: self.melted_tokens,
                next: next.melted_tokens,
            });
        }

        let minted_delta = next.minted_tokens - self.minted_tokens;
        let melted_delta = next.melted_tokens - self.melted_tokens;

        if out_sum > in_sum {
            let minted = *out_sum - *in_sum;
            if !melted_delta.is_zero() {
                return Err(TokenSchemeError::MintAndMelt);
            }
            if minted_delta != minted {
                return Err(TokenSchemeError::MintMismatch {
                    counter: minted_delta,
                    tokens: minted,
                });
            }
        } else if out_sum < in_sum {
            // Tokens removed beyond the melted delta are burned.
            let removed = *in_sum - *out_sum;
            if !minted_delta.is_zero() {
                return Err(TokenSchemeError::MintAndMelt);
            }
            if melted_delta > removed {
                return Err(TokenSchemeError::MeltExceedsDecrease {
                    counter: melted_delta,
                    tokens: removed,
                });
            }
        } else if !minted_delta.is_zero() || !melted_delta.is_zero() {
            return Err(TokenSchemeError::CountersChangedWithoutTokenDelta);
        }
        Ok(())
    }

    fn destruction_valid(&self, in_sum: &U256, out_sum: &U256) -> Result<(), TokenSchemeError> {
        let removed = in_sum.saturating_sub(*out_sum);
        let outstanding = self.circulating_supply();
        if out_sum > in_sum || removed != outstanding {
            return Err(TokenSchemeError::OutstandingSupply(outstanding.saturating_sub(removed)));
        }
        Ok(())
    }
}
