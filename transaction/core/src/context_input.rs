// Copyright (c) 2024 Botho Foundation

use nova_transaction_types::{AccountId, CommitmentId};
use serde::{Deserialize, Serialize};

/// Read-only state a transaction refers to without consuming it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ContextInput {
    /// The slot commitment the transaction was issued against.
    Commitment(CommitmentId),
    /// The block issuance credit of an account.
    BlockIssuanceCredit(AccountId),
    /// A reward claim for the input at this index.
    Reward(u16),
}
