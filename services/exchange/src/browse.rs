//! Browse and Query Service
//!
//! Read-side of the exchange: paging through open listings with optional
//! text and matches-my-holdings filters, and the caller's own listed
//! instances. Callers never see their own instances when browsing, since
//! nobody can swap with themselves.

use crate::config::ExchangeConfig;
use asset_store::{AssetRecordStore, ListingFilter, Page, PageResult};
use std::sync::Arc;
use tracing::debug;
use types::{AssetInstance, ExchangeError, ListingState, WalletAddress};

/// Filter options for browsing open listings.
#[derive(Debug, Clone, Default)]
pub struct BrowseQuery {
    /// Case-insensitive substring over batch name/category/merchant/description
    pub text: Option<String>,
    /// Restrict to listings whose desired set is empty or names an instance
    /// the caller currently holds
    pub matches_my_holdings: bool,
}

pub struct BrowseService<S: AssetRecordStore> {
    store: Arc<S>,
    config: ExchangeConfig,
}

impl<S: AssetRecordStore> BrowseService<S> {
    pub fn new(store: Arc<S>, config: ExchangeConfig) -> Self {
        Self { store, config }
    }

    /// Page through open listings visible to the caller.
    ///
    /// Ordering is stable across pages for a fixed filter (listing creation
    /// time, then instance key). A zero `page_size` requests the configured
    /// default; anything above the configured maximum is clamped down.
    pub async fn browse_open_listings(
        &self,
        caller: WalletAddress,
        query: BrowseQuery,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult<AssetInstance>, ExchangeError> {
        let desired_intersects = if query.matches_my_holdings {
            Some(self.store.holdings(&caller).await)
        } else {
            None
        };

        let filter = ListingFilter {
            states: vec![ListingState::Open],
            owner: None,
            exclude_owner: Some(caller),
            desired_intersects,
            text: query.text,
        };
        let size = self.config.effective_page_size(page_size);
        let result = self
            .store
            .query_listings(&filter, Some(Page { index: page, size }))
            .await;
        debug!(
            %caller,
            page,
            size,
            total = result.total_items,
            "browsed open listings"
        );
        Ok(result)
    }

    /// All instances the caller owns that carry an Open or Pending listing.
    pub async fn list_my_listings(
        &self,
        caller: WalletAddress,
    ) -> Result<Vec<AssetInstance>, ExchangeError> {
        let filter = ListingFilter {
            states: vec![ListingState::Open, ListingState::Pending],
            owner: Some(caller),
            ..Default::default()
        };
        Ok(self.store.query_listings(&filter, None).await.items)
    }
}
