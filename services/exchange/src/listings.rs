//! Listing Manager - Create and Cancel Swap Listings
//!
//! Owners declare an instance available for exchange together with its
//! acceptance criteria, or withdraw that declaration. Both operations
//! persist through a single-record conditional update; a concurrent version
//! move surfaces as `Conflict` with zero side effects.

use crate::now_ms;
use asset_store::AssetRecordStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};
use types::{ExchangeError, InstanceKey, Listing, ListingState, WalletAddress};

pub struct ListingManager<S: AssetRecordStore> {
    store: Arc<S>,
}

impl<S: AssetRecordStore> ListingManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List an owned instance for exchange.
    ///
    /// `desired` names the instances the owner will accept in return; an
    /// empty set means open to any instance. Every desired id must resolve
    /// to an existing instance and may not reference the listed instance
    /// itself.
    pub async fn create_listing(
        &self,
        key: InstanceKey,
        caller: WalletAddress,
        desired: BTreeSet<InstanceKey>,
    ) -> Result<Listing, ExchangeError> {
        let instance = self
            .store
            .instance(key)
            .await
            .ok_or_else(|| ExchangeError::not_found(key))?;

        if !instance.is_owned_by(&caller) {
            return Err(ExchangeError::NotOwner { caller, key });
        }
        if instance.live_listing().is_some() {
            return Err(ExchangeError::AlreadyListed { key });
        }

        for wanted in &desired {
            if *wanted == key {
                return Err(ExchangeError::InvalidDesiredSet {
                    key,
                    reason: "a listing cannot desire the instance it lists".into(),
                });
            }
            if self.store.instance(*wanted).await.is_none() {
                return Err(ExchangeError::InvalidDesiredSet {
                    key,
                    reason: format!("desired instance {wanted} does not exist"),
                });
            }
        }

        let listing = Listing::open(desired, now_ms());
        let persisted = listing.clone();
        self.store
            .conditional_update(
                key,
                instance.version,
                Box::new(move |record| record.listing = Some(persisted)),
            )
            .await?;

        info!(%key, %caller, desired = listing.desired.len(), "listing created");
        Ok(listing)
    }

    /// Withdraw an open listing.
    ///
    /// Cancelling an already-cancelled listing is an idempotent no-op; an
    /// instance that was never listed reports `NotListed`, as does one whose
    /// listing is pending a counter-offer (the offer must be rejected first).
    pub async fn cancel_listing(
        &self,
        key: InstanceKey,
        caller: WalletAddress,
    ) -> Result<(), ExchangeError> {
        let instance = self
            .store
            .instance(key)
            .await
            .ok_or_else(|| ExchangeError::not_found(key))?;

        if !instance.is_owned_by(&caller) {
            return Err(ExchangeError::NotOwner { caller, key });
        }

        match instance.listing.as_ref().map(|l| l.state) {
            Some(ListingState::Cancelled) => {
                debug!(%key, "cancel of already-cancelled listing, no-op");
                Ok(())
            }
            Some(ListingState::Open) => {
                self.store
                    .conditional_update(
                        key,
                        instance.version,
                        Box::new(|record| {
                            if let Some(listing) = record.listing.as_mut() {
                                listing.state = ListingState::Cancelled;
                            }
                        }),
                    )
                    .await?;
                info!(%key, %caller, "listing cancelled");
                Ok(())
            }
            // A pending negotiation must be rejected before the listing can go
            Some(ListingState::Pending) | None => Err(ExchangeError::NotListed { key }),
        }
    }
}
