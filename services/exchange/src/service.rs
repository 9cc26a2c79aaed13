//! Exchange Service Facade
//!
//! The subsystem's whole exposed surface: six operations, each resolving the
//! caller's credential through the identity provider before dispatching to
//! the listing manager, exchange coordinator, or browse service.

use crate::browse::{BrowseQuery, BrowseService};
use crate::config::ExchangeConfig;
use crate::coordinator::ExchangeCoordinator;
use crate::identity::IdentityProvider;
use crate::listings::ListingManager;
use asset_store::{AssetRecordStore, PageResult};
use std::collections::BTreeSet;
use std::sync::Arc;
use types::{
    AssetInstance, ExchangeError, ExchangeOffer, InstanceKey, Listing, OfferId, SwapDecision,
};

pub struct ExchangeService<S: AssetRecordStore, I: IdentityProvider> {
    identity: Arc<I>,
    listings: ListingManager<S>,
    coordinator: ExchangeCoordinator<S>,
    browse: BrowseService<S>,
}

impl<S: AssetRecordStore, I: IdentityProvider> ExchangeService<S, I> {
    pub fn new(store: Arc<S>, identity: Arc<I>, config: ExchangeConfig) -> Self {
        Self {
            identity,
            listings: ListingManager::new(store.clone()),
            coordinator: ExchangeCoordinator::new(
                store.clone(),
                config.max_swap_retries,
                config.offer_ttl_secs,
            ),
            browse: BrowseService::new(store, config),
        }
    }

    pub async fn create_listing(
        &self,
        credential: &str,
        key: InstanceKey,
        desired: BTreeSet<InstanceKey>,
    ) -> Result<Listing, ExchangeError> {
        let caller = self.identity.resolve_caller(credential).await?;
        self.listings.create_listing(key, caller, desired).await
    }

    pub async fn cancel_listing(
        &self,
        credential: &str,
        key: InstanceKey,
    ) -> Result<(), ExchangeError> {
        let caller = self.identity.resolve_caller(credential).await?;
        self.listings.cancel_listing(key, caller).await
    }

    pub async fn propose_swap(
        &self,
        credential: &str,
        target: InstanceKey,
        offered: InstanceKey,
    ) -> Result<ExchangeOffer, ExchangeError> {
        let caller = self.identity.resolve_caller(credential).await?;
        self.coordinator.propose_swap(target, offered, caller).await
    }

    pub async fn resolve_swap(
        &self,
        credential: &str,
        offer: OfferId,
        decision: SwapDecision,
    ) -> Result<(), ExchangeError> {
        let caller = self.identity.resolve_caller(credential).await?;
        self.coordinator.resolve_swap(offer, decision, caller).await
    }

    pub async fn browse_open_listings(
        &self,
        credential: &str,
        query: BrowseQuery,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult<AssetInstance>, ExchangeError> {
        let caller = self.identity.resolve_caller(credential).await?;
        self.browse
            .browse_open_listings(caller, query, page, page_size)
            .await
    }

    pub async fn list_my_listings(
        &self,
        credential: &str,
    ) -> Result<Vec<AssetInstance>, ExchangeError> {
        let caller = self.identity.resolve_caller(credential).await?;
        self.browse.list_my_listings(caller).await
    }
}
