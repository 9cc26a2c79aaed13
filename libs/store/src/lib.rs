//! # Asset Record Store - Optimistic-Concurrency Persistence Seam
//!
//! ## Purpose
//!
//! Storage interface consumed by the exchange subsystem. Every mutation of an
//! [`AssetInstance`] goes through a conditional update keyed on the record's
//! `version`; the store guarantees the compare-and-write is a single atomic
//! operation, never a separate read-then-write. The two-record variant is the
//! multi-key transaction the exchange coordinator uses to commit a swap with
//! no partially-applied state ever observable.
//!
//! ## Integration Points
//!
//! - **Listing Manager**: single-record conditional updates for create/cancel
//! - **Exchange Coordinator**: two-record transactions for propose/accept,
//!   offer records keyed by [`OfferId`]
//! - **Browse Service**: filtered, stably-ordered, offset-paginated scans
//! - **Seeding**: the in-memory implementation exposes batch registration and
//!   instance seeding standing in for the out-of-scope minting flow

pub mod memory;

pub use memory::{InMemoryStore, SeedError, StoreStats};

use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;
use types::{
    AssetBatch, AssetInstance, ExchangeOffer, ExchangeError, InstanceKey, ListingState, OfferId,
    WalletAddress,
};

/// Errors surfaced by conditional store operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// The record to update does not exist
    #[error("record {key} is missing")]
    MissingRecord { key: InstanceKey },

    /// The record's version moved since it was read
    #[error("version conflict on {key}: expected {expected}, found {actual}")]
    VersionConflict {
        key: InstanceKey,
        expected: u64,
        actual: u64,
    },
}

impl From<StoreError> for ExchangeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingRecord { key } => ExchangeError::not_found(key),
            StoreError::VersionConflict { key, .. } => ExchangeError::Conflict { key },
        }
    }
}

/// Single-record mutation applied inside a conditional update.
pub type Mutator = Box<dyn FnOnce(&mut AssetInstance) + Send>;

/// Two-record mutation applied inside a pair transaction; arguments arrive in
/// the caller's (a, b) order regardless of internal lock order.
pub type PairMutator = Box<dyn FnOnce(&mut AssetInstance, &mut AssetInstance) + Send>;

/// Predicate bundle for listing scans.
///
/// A record matches when it carries a listing whose state is in `states` and
/// every populated field below agrees with it.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Listing states to include; a record without a listing never matches
    pub states: Vec<ListingState>,
    /// Only instances owned by this address
    pub owner: Option<WalletAddress>,
    /// Never instances owned by this address (browse excludes the caller)
    pub exclude_owner: Option<WalletAddress>,
    /// Only listings whose desired set is empty (open to any) or intersects
    /// this set ("matches my holdings")
    pub desired_intersects: Option<BTreeSet<InstanceKey>>,
    /// Case-insensitive substring over batch name/category/merchant/description
    pub text: Option<String>,
}

/// Offset-based page request; `index` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: u32,
    pub size: u32,
}

/// One page of scan results with totals for the fixed filter.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: u32,
}

impl<T> PageResult<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
        }
    }
}

/// The exchange subsystem's persistence contract.
///
/// Assumed durable and strongly consistent for conditional updates. The pair
/// transaction must be all-or-nothing: either both records mutate and bump
/// their versions, or neither changes at all.
#[async_trait]
pub trait AssetRecordStore: Send + Sync {
    /// Read batch metadata.
    async fn batch(&self, id: types::BatchId) -> Option<AssetBatch>;

    /// Read a snapshot of one instance record.
    async fn instance(&self, key: InstanceKey) -> Option<AssetInstance>;

    /// Keys of every instance currently owned by `owner`.
    async fn holdings(&self, owner: &WalletAddress) -> BTreeSet<InstanceKey>;

    /// Atomically apply `mutate` and bump the version, only if the record's
    /// current version equals `expected_version`. Returns the updated record.
    async fn conditional_update(
        &self,
        key: InstanceKey,
        expected_version: u64,
        mutate: Mutator,
    ) -> Result<AssetInstance, StoreError>;

    /// Atomically apply `mutate` to two distinct records and bump both
    /// versions, only if both current versions match. The conflict error
    /// names whichever record moved first in check order.
    async fn conditional_update_pair(
        &self,
        a: InstanceKey,
        expected_a: u64,
        b: InstanceKey,
        expected_b: u64,
        mutate: PairMutator,
    ) -> Result<(AssetInstance, AssetInstance), StoreError>;

    /// Filtered scan over listed instances with stable
    /// `(listing.created_at_ms, key)` ordering. `None` returns all matches
    /// as a single page.
    async fn query_listings(
        &self,
        filter: &ListingFilter,
        page: Option<Page>,
    ) -> PageResult<AssetInstance>;

    /// Allocate the next offer identifier.
    async fn next_offer_id(&self) -> OfferId;

    /// Record a freshly proposed offer.
    async fn insert_offer(&self, offer: ExchangeOffer);

    /// Read an offer record.
    async fn offer(&self, id: OfferId) -> Option<ExchangeOffer>;

    /// Remove and return an offer record.
    async fn remove_offer(&self, id: OfferId) -> Option<ExchangeOffer>;
}
