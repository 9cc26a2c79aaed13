//! Error types for identifier validation and exchange operations
//!
//! Every exposed exchange operation returns one of the [`ExchangeError`]
//! kinds; none of them represents corrupted state, and only
//! [`ExchangeError::Conflict`] carries a retry recommendation.

use crate::identifiers::{InstanceKey, WalletAddress};
use thiserror::Error;

/// Errors that can occur while constructing typed identifiers
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentifierError {
    /// Identifier value is null/zero when non-null required
    #[error("identifier cannot be null/zero")]
    NullId,

    /// Wallet address string is not 20 bytes of hex
    #[error("'{input}' is not a valid 20-byte hex wallet address")]
    InvalidAddress { input: String },
}

/// Failure taxonomy of the exchange subsystem's operations.
///
/// All variants are terminal for the given inputs except `Conflict`, which
/// guarantees zero side effects occurred and is always safe to retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExchangeError {
    /// A referenced instance, listing, or offer does not exist
    #[error("no record found for {reference}")]
    NotFound { reference: String },

    /// Caller lacks rights over the instance they are acting on
    #[error("{caller} does not own instance {key}")]
    NotOwner {
        caller: WalletAddress,
        key: InstanceKey,
    },

    /// Instance already carries a live (non-cancelled) listing
    #[error("instance {key} is already listed")]
    AlreadyListed { key: InstanceKey },

    /// No cancellable listing exists on the instance
    #[error("instance {key} has no open listing")]
    NotListed { key: InstanceKey },

    /// Acceptance criteria reference a missing instance or the listed instance itself
    #[error("desired set for {key} is invalid: {reason}")]
    InvalidDesiredSet { key: InstanceKey, reason: String },

    /// Proposal against a listing that is not in the Open state
    #[error("listing on {key} is not open")]
    ListingNotOpen { key: InstanceKey },

    /// The target listing's criteria reject the offered instance
    #[error("listing on {target} does not accept {offered}")]
    NotAcceptable {
        target: InstanceKey,
        offered: InstanceKey,
    },

    /// Both sides of the proposed swap belong to the same owner
    #[error("{owner} cannot swap with themselves")]
    SelfSwap { owner: WalletAddress },

    /// Optimistic-concurrency collision; zero side effects, safe to retry
    #[error("concurrent modification of {key}, retry the operation")]
    Conflict { key: InstanceKey },

    /// The caller's credential could not be resolved to a wallet address
    #[error("caller identity could not be resolved: {reason}")]
    Auth { reason: String },
}

impl ExchangeError {
    /// Only `Conflict` is worth retrying with identical inputs; everything
    /// else requires caller correction first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExchangeError::Conflict { .. })
    }

    /// Shorthand for a `NotFound` over any displayable record reference.
    pub fn not_found(reference: impl ToString) -> Self {
        ExchangeError::NotFound {
            reference: reference.to_string(),
        }
    }
}
