//! Exchange Domain Model - Batches, Instances, Listings, Offers
//!
//! Typed state for the swap subsystem. The previous generation of this
//! system kept listing intent, acceptance criteria, and negotiation progress
//! in one loosely-typed blob; here each concern has its own field with a
//! tagged state enum, and every instance carries a monotonic `version` used
//! by the record store's conditional updates.

use crate::identifiers::{BatchId, InstanceKey, OfferId, WalletAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A creator-defined template for a family of numbered instances.
///
/// Immutable after registration except administrative correction; the
/// exchange subsystem only ever reads it (browse text filtering).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBatch {
    pub id: BatchId,
    pub name: String,
    pub category: String,
    /// Merchant identity that issued the batch
    pub merchant: String,
    pub description: String,
    /// Opaque reference into the file store, never dereferenced here
    pub image_ref: Option<String>,
    /// Batch-level expiry of the underlying perk, unix millis
    pub expires_at_ms: Option<i64>,
    /// Number of serially-numbered units, serials run 1..=total_supply
    pub total_supply: u32,
    pub creator: WalletAddress,
}

/// Lifecycle state of a listing.
///
/// `Cancelled` is a tombstone: the listing stays attached to the instance but
/// every read path treats the instance as not listed, and a fresh listing may
/// replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingState {
    Open,
    /// Exactly one outstanding offer is negotiating against this listing
    Pending,
    Cancelled,
}

/// An owner's declaration that an instance is available for exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Instance identifiers the owner will accept in return; empty means
    /// open to any instance
    pub desired: BTreeSet<InstanceKey>,
    pub state: ListingState,
    /// Creation time in unix millis; part of the stable browse ordering
    pub created_at_ms: i64,
}

impl Listing {
    pub fn open(desired: BTreeSet<InstanceKey>, created_at_ms: i64) -> Self {
        Self {
            desired,
            state: ListingState::Open,
            created_at_ms,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == ListingState::Open
    }

    /// A tombstoned listing counts as absent for every exchange operation.
    pub fn is_live(&self) -> bool {
        self.state != ListingState::Cancelled
    }
}

/// One uniquely-owned, numbered unit of a batch.
///
/// Only `owner`, `listing`, and `version` ever mutate after seeding, and only
/// through the listing manager and exchange coordinator. Invariant: a live
/// listing implies a present owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInstance {
    pub key: InstanceKey,
    /// Unassigned instances have no owner and can never be listed
    pub owner: Option<WalletAddress>,
    pub listing: Option<Listing>,
    /// Monotonic counter, the sole coordination point for optimistic
    /// concurrency; bumped by the store on every successful conditional write
    pub version: u64,
}

impl AssetInstance {
    pub fn new(key: InstanceKey, owner: Option<WalletAddress>) -> Self {
        Self {
            key,
            owner,
            listing: None,
            version: 0,
        }
    }

    pub fn is_owned_by(&self, address: &WalletAddress) -> bool {
        self.owner.as_ref() == Some(address)
    }

    /// The listing, unless it is a cancelled tombstone.
    pub fn live_listing(&self) -> Option<&Listing> {
        self.listing.as_ref().filter(|l| l.is_live())
    }
}

/// Resolution verdict passed by the target listing's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDecision {
    Accept,
    Reject,
}

/// Lifecycle state of an exchange offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferState {
    Proposed,
    Accepted,
    Rejected,
    Expired,
}

/// Ephemeral record of a proposed pairing: a listed target instance against
/// a candidate instance from another owner.
///
/// Created by `propose_swap`, resolved (and discarded) by the exchange
/// coordinator, never mutated by any other component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeOffer {
    pub id: OfferId,
    /// The listed instance the proposer wants
    pub target: InstanceKey,
    /// The instance the proposer puts up in exchange
    pub offered: InstanceKey,
    pub proposer: WalletAddress,
    pub state: OfferState,
    pub created_at_ms: i64,
    /// Instance versions observed when the proposal committed; diagnostic
    /// only, resolution re-reads current versions
    pub target_version: u64,
    pub offered_version: u64,
}
