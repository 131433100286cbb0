// Copyright (c) 2024 Botho Foundation

//! Utilities for assembling and signing Nova transactions.

#![deny(missing_docs)]

mod error;
mod output_builder;
mod signer;
mod transaction_builder;

pub use error::{OutputBuilderError, TxBuilderError};
pub use output_builder::{
    AccountOutputBuilder, BasicOutputBuilder, FoundryOutputBuilder, NftOutputBuilder,
};
pub use signer::InMemoryAddressSigner;
pub use transaction_builder::TransactionBuilder;
