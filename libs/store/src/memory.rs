//! In-Memory Asset Record Store
//!
//! Reference implementation of [`AssetRecordStore`] backed by `DashMap` for
//! concurrent access, with per-record `parking_lot` mutexes so conditional
//! updates are genuine compare-and-write operations. The two-record
//! transaction acquires locks in `InstanceKey` order, which keeps concurrent
//! swap commits from livelocking against each other.

use crate::{
    AssetRecordStore, ListingFilter, Mutator, Page, PageResult, PairMutator, StoreError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use types::{
    AssetBatch, AssetInstance, BatchId, ExchangeOffer, InstanceKey, ListingState, OfferId,
    WalletAddress,
};

/// Errors from the seeding surface that stands in for the minting flow
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeedError {
    #[error("batch {id} is already registered")]
    DuplicateBatch { id: BatchId },

    #[error("batch {id} is not registered")]
    UnknownBatch { id: BatchId },

    #[error("serial of {key} is outside 1..={total_supply}")]
    SerialOutOfRange { key: InstanceKey, total_supply: u32 },

    #[error("instance {key} is already seeded")]
    DuplicateInstance { key: InstanceKey },
}

/// Point-in-time counters over the store contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub batches: usize,
    pub instances: usize,
    pub open_listings: usize,
    pub pending_listings: usize,
    pub outstanding_offers: usize,
}

/// DashMap-backed record store.
pub struct InMemoryStore {
    batches: DashMap<BatchId, AssetBatch>,
    records: DashMap<InstanceKey, Arc<Mutex<AssetInstance>>>,
    offers: DashMap<OfferId, ExchangeOffer>,
    offer_seq: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            batches: DashMap::new(),
            records: DashMap::new(),
            offers: DashMap::new(),
            offer_seq: AtomicU64::new(1),
        }
    }

    /// Register batch metadata. Batches are immutable once registered.
    pub fn register_batch(&self, batch: AssetBatch) -> Result<(), SeedError> {
        if self.batches.contains_key(&batch.id) {
            return Err(SeedError::DuplicateBatch { id: batch.id });
        }
        debug!(batch = %batch.id, supply = batch.total_supply, "registered batch");
        self.batches.insert(batch.id, batch);
        Ok(())
    }

    /// Seed one instance record of a registered batch, optionally assigned.
    pub fn seed_instance(
        &self,
        key: InstanceKey,
        owner: Option<WalletAddress>,
    ) -> Result<(), SeedError> {
        let batch = self
            .batches
            .get(&key.batch)
            .ok_or(SeedError::UnknownBatch { id: key.batch })?;
        if key.serial == 0 || key.serial > batch.total_supply {
            return Err(SeedError::SerialOutOfRange {
                key,
                total_supply: batch.total_supply,
            });
        }
        if self.records.contains_key(&key) {
            return Err(SeedError::DuplicateInstance { key });
        }
        self.records
            .insert(key, Arc::new(Mutex::new(AssetInstance::new(key, owner))));
        Ok(())
    }

    /// Counters for observability and tests.
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            batches: self.batches.len(),
            instances: self.records.len(),
            outstanding_offers: self.offers.len(),
            ..Default::default()
        };
        for entry in self.records.iter() {
            let record = entry.value().lock();
            match record.listing.as_ref().map(|l| l.state) {
                Some(ListingState::Open) => stats.open_listings += 1,
                Some(ListingState::Pending) => stats.pending_listings += 1,
                _ => {}
            }
        }
        stats
    }

    fn record(&self, key: InstanceKey) -> Option<Arc<Mutex<AssetInstance>>> {
        self.records.get(&key).map(|entry| entry.value().clone())
    }

    fn matches(&self, instance: &AssetInstance, filter: &ListingFilter) -> bool {
        let listing = match instance.listing.as_ref() {
            Some(listing) => listing,
            None => return false,
        };
        if !filter.states.contains(&listing.state) {
            return false;
        }
        if let Some(owner) = filter.owner.as_ref() {
            if !instance.is_owned_by(owner) {
                return false;
            }
        }
        if let Some(excluded) = filter.exclude_owner.as_ref() {
            if instance.is_owned_by(excluded) {
                return false;
            }
        }
        if let Some(holdings) = filter.desired_intersects.as_ref() {
            // An empty desired set is open to any instance and therefore
            // counts as a match for every holder.
            let intersects = listing.desired.is_empty()
                || listing.desired.iter().any(|key| holdings.contains(key));
            if !intersects {
                return false;
            }
        }
        if let Some(text) = filter.text.as_ref() {
            let needle = text.to_lowercase();
            let matched = self.batches.get(&instance.key.batch).is_some_and(|batch| {
                [
                    &batch.name,
                    &batch.category,
                    &batch.merchant,
                    &batch.description,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            });
            if !matched {
                return false;
            }
        }
        true
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetRecordStore for InMemoryStore {
    async fn batch(&self, id: BatchId) -> Option<AssetBatch> {
        self.batches.get(&id).map(|entry| entry.value().clone())
    }

    async fn instance(&self, key: InstanceKey) -> Option<AssetInstance> {
        self.record(key).map(|record| record.lock().clone())
    }

    async fn holdings(&self, owner: &WalletAddress) -> BTreeSet<InstanceKey> {
        self.records
            .iter()
            .filter(|entry| entry.value().lock().is_owned_by(owner))
            .map(|entry| *entry.key())
            .collect()
    }

    async fn conditional_update(
        &self,
        key: InstanceKey,
        expected_version: u64,
        mutate: Mutator,
    ) -> Result<AssetInstance, StoreError> {
        let record = self
            .record(key)
            .ok_or(StoreError::MissingRecord { key })?;
        let mut instance = record.lock();
        if instance.version != expected_version {
            return Err(StoreError::VersionConflict {
                key,
                expected: expected_version,
                actual: instance.version,
            });
        }
        mutate(&mut instance);
        instance.version += 1;
        Ok(instance.clone())
    }

    async fn conditional_update_pair(
        &self,
        a: InstanceKey,
        expected_a: u64,
        b: InstanceKey,
        expected_b: u64,
        mutate: PairMutator,
    ) -> Result<(AssetInstance, AssetInstance), StoreError> {
        assert_ne!(a, b, "pair update requires two distinct records");
        let record_a = self.record(a).ok_or(StoreError::MissingRecord { key: a })?;
        let record_b = self.record(b).ok_or(StoreError::MissingRecord { key: b })?;

        // Lock in key order so concurrent pair transactions cannot deadlock.
        let (mut first, mut second) = if a < b {
            let first = record_a.lock();
            let second = record_b.lock();
            (first, second)
        } else {
            let second = record_b.lock();
            let first = record_a.lock();
            (first, second)
        };

        if first.version != expected_a {
            return Err(StoreError::VersionConflict {
                key: a,
                expected: expected_a,
                actual: first.version,
            });
        }
        if second.version != expected_b {
            return Err(StoreError::VersionConflict {
                key: b,
                expected: expected_b,
                actual: second.version,
            });
        }
        mutate(&mut first, &mut second);
        first.version += 1;
        second.version += 1;
        Ok((first.clone(), second.clone()))
    }

    async fn query_listings(
        &self,
        filter: &ListingFilter,
        page: Option<Page>,
    ) -> PageResult<AssetInstance> {
        let mut matches: Vec<AssetInstance> = self
            .records
            .iter()
            .filter_map(|entry| {
                let instance = entry.value().lock().clone();
                self.matches(&instance, filter).then_some(instance)
            })
            .collect();
        // Stable order across pages for a fixed filter
        matches.sort_by_key(|instance| {
            (
                instance
                    .listing
                    .as_ref()
                    .map(|l| l.created_at_ms)
                    .unwrap_or_default(),
                instance.key,
            )
        });

        let total_items = matches.len();
        match page {
            None => PageResult {
                items: matches,
                total_items,
                total_pages: if total_items == 0 { 0 } else { 1 },
            },
            Some(page) if page.size == 0 => PageResult::empty(),
            Some(page) => {
                let size = page.size as usize;
                let total_pages = total_items.div_ceil(size) as u32;
                let start = page.index as usize * size;
                let items = if start >= total_items {
                    Vec::new()
                } else {
                    matches[start..(start + size).min(total_items)].to_vec()
                };
                PageResult {
                    items,
                    total_items,
                    total_pages,
                }
            }
        }
    }

    async fn next_offer_id(&self) -> OfferId {
        OfferId::new(self.offer_seq.fetch_add(1, Ordering::Relaxed))
    }

    async fn insert_offer(&self, offer: ExchangeOffer) {
        debug!(offer = %offer.id, target = %offer.target, offered = %offer.offered, "recorded offer");
        self.offers.insert(offer.id, offer);
    }

    async fn offer(&self, id: OfferId) -> Option<ExchangeOffer> {
        self.offers.get(&id).map(|entry| entry.value().clone())
    }

    async fn remove_offer(&self, id: OfferId) -> Option<ExchangeOffer> {
        self.offers.remove(&id).map(|(_, offer)| offer)
    }
}
