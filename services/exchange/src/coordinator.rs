//! Exchange Coordinator - Two-Sided Swap Orchestration
//!
//! Drives the listing state machine from proposal to settlement:
//!
//! ```text
//! Open --propose--> Pending --reject--> Open
//!                   Pending --accept--> (listings deleted, ownership swapped)
//! ```
//!
//! A proposal validates both sides, then commits the Pending transition with
//! a two-record conditional transaction keyed on both instances' versions,
//! retrying the whole read-validate-write cycle up to a configured bound.
//! Settlement exchanges ownership under the same two-record transaction;
//! every failure path leaves both instances completely unchanged.

use crate::{matcher, now_ms};
use asset_store::{AssetRecordStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::{
    ExchangeError, ExchangeOffer, InstanceKey, ListingState, OfferId, OfferState, SwapDecision,
    WalletAddress,
};

pub struct ExchangeCoordinator<S: AssetRecordStore> {
    store: Arc<S>,
    max_retries: u32,
    offer_ttl_ms: Option<i64>,
}

impl<S: AssetRecordStore> ExchangeCoordinator<S> {
    pub fn new(store: Arc<S>, max_retries: u32, offer_ttl_secs: Option<u64>) -> Self {
        Self {
            store,
            max_retries: max_retries.max(1),
            offer_ttl_ms: offer_ttl_secs.map(|secs| secs as i64 * 1000),
        }
    }

    /// Propose exchanging `offered` for the listed `target` instance.
    ///
    /// Validation order: missing records, proposer ownership, listing
    /// openness, acceptance criteria, distinct owners. The committed
    /// transition parks the target listing in `Pending`, which blocks every
    /// other proposal until the listing owner resolves this offer.
    pub async fn propose_swap(
        &self,
        target: InstanceKey,
        offered: InstanceKey,
        proposer: WalletAddress,
    ) -> Result<ExchangeOffer, ExchangeError> {
        for attempt in 1..=self.max_retries {
            let target_instance = self
                .store
                .instance(target)
                .await
                .ok_or_else(|| ExchangeError::not_found(target))?;
            let offered_instance = self
                .store
                .instance(offered)
                .await
                .ok_or_else(|| ExchangeError::not_found(offered))?;

            let listing = target_instance
                .live_listing()
                .ok_or_else(|| ExchangeError::not_found(format!("listing on {target}")))?;

            if !offered_instance.is_owned_by(&proposer) {
                return Err(ExchangeError::NotOwner {
                    caller: proposer,
                    key: offered,
                });
            }
            if !listing.is_open() {
                return Err(ExchangeError::ListingNotOpen { key: target });
            }
            if !matcher::is_acceptable(listing, offered) {
                return Err(ExchangeError::NotAcceptable { target, offered });
            }
            if target_instance.owner == offered_instance.owner {
                return Err(ExchangeError::SelfSwap { owner: proposer });
            }

            let commit = self
                .store
                .conditional_update_pair(
                    target,
                    target_instance.version,
                    offered,
                    offered_instance.version,
                    Box::new(|target_record, _offered_record| {
                        if let Some(listing) = target_record.listing.as_mut() {
                            listing.state = ListingState::Pending;
                        }
                    }),
                )
                .await;

            match commit {
                Ok((committed_target, committed_offered)) => {
                    let offer = ExchangeOffer {
                        id: self.store.next_offer_id().await,
                        target,
                        offered,
                        proposer,
                        state: OfferState::Proposed,
                        created_at_ms: now_ms(),
                        target_version: committed_target.version,
                        offered_version: committed_offered.version,
                    };
                    self.store.insert_offer(offer.clone()).await;
                    info!(offer = %offer.id, %target, %offered, %proposer, "swap proposed");
                    return Ok(offer);
                }
                Err(StoreError::VersionConflict { key, .. }) if attempt < self.max_retries => {
                    debug!(%key, attempt, "proposal hit version conflict, retrying");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(ExchangeError::Conflict { key: target })
    }

    /// Resolve a proposed swap, invoked by the target listing's owner.
    ///
    /// Reject reverts the listing to Open and discards the offer. Accept
    /// exchanges ownership of the two instances, deletes both sides'
    /// listings, and bumps both versions in one conditional transaction; a
    /// `Conflict` result had zero side effects and the caller should
    /// re-fetch and retry (or reject to recover the listing).
    pub async fn resolve_swap(
        &self,
        offer_id: OfferId,
        decision: SwapDecision,
        caller: WalletAddress,
    ) -> Result<(), ExchangeError> {
        let offer = self
            .store
            .offer(offer_id)
            .await
            .ok_or_else(|| ExchangeError::not_found(offer_id))?;

        if let Some(ttl_ms) = self.offer_ttl_ms {
            if now_ms().saturating_sub(offer.created_at_ms) > ttl_ms {
                return self.expire_offer(offer).await;
            }
        }

        let target_instance = match self.store.instance(offer.target).await {
            Some(instance) => instance,
            None => {
                self.store.remove_offer(offer.id).await;
                return Err(ExchangeError::not_found(offer.target));
            }
        };

        let pending = matches!(
            target_instance.listing.as_ref().map(|l| l.state),
            Some(ListingState::Pending)
        );
        if !pending {
            // The listing this offer negotiated against no longer exists,
            // e.g. the target was given away in another settlement.
            warn!(offer = %offer.id, target = %offer.target, "discarding dangling offer");
            self.store.remove_offer(offer.id).await;
            return Err(ExchangeError::not_found(offer.id));
        }

        if !target_instance.is_owned_by(&caller) {
            return Err(ExchangeError::NotOwner {
                caller,
                key: offer.target,
            });
        }

        match decision {
            SwapDecision::Reject => {
                self.store
                    .conditional_update(
                        offer.target,
                        target_instance.version,
                        Box::new(|record| {
                            if let Some(listing) = record.listing.as_mut() {
                                listing.state = ListingState::Open;
                            }
                        }),
                    )
                    .await?;
                self.store.remove_offer(offer.id).await;
                info!(offer = %offer.id, target = %offer.target, "swap rejected, listing reopened");
                Ok(())
            }
            SwapDecision::Accept => {
                let offered_instance = self
                    .store
                    .instance(offer.offered)
                    .await
                    .ok_or_else(|| ExchangeError::not_found(offer.offered))?;

                // The proposer must still hold their side; if it moved since
                // the proposal the offer can never settle.
                if !offered_instance.is_owned_by(&offer.proposer) {
                    return Err(ExchangeError::Conflict { key: offer.offered });
                }

                let new_target_owner = offer.proposer;
                let new_offered_owner = caller;
                self.store
                    .conditional_update_pair(
                        offer.target,
                        target_instance.version,
                        offer.offered,
                        offered_instance.version,
                        Box::new(move |target_record, offered_record| {
                            target_record.owner = Some(new_target_owner);
                            offered_record.owner = Some(new_offered_owner);
                            // A party's listing on an instance they just gave
                            // away makes no sense either way, so both go.
                            target_record.listing = None;
                            offered_record.listing = None;
                        }),
                    )
                    .await?;
                self.store.remove_offer(offer.id).await;
                info!(
                    offer = %offer.id,
                    target = %offer.target,
                    offered = %offer.offered,
                    "swap settled, ownership exchanged"
                );
                Ok(())
            }
        }
    }

    /// Lazily expire an offer past its TTL: reopen the listing, discard the
    /// offer, and report it as gone.
    async fn expire_offer(&self, offer: ExchangeOffer) -> Result<(), ExchangeError> {
        if let Some(target_instance) = self.store.instance(offer.target).await {
            let pending = matches!(
                target_instance.listing.as_ref().map(|l| l.state),
                Some(ListingState::Pending)
            );
            if pending {
                self.store
                    .conditional_update(
                        offer.target,
                        target_instance.version,
                        Box::new(|record| {
                            if let Some(listing) = record.listing.as_mut() {
                                listing.state = ListingState::Open;
                            }
                        }),
                    )
                    .await?;
            }
        }
        self.store.remove_offer(offer.id).await;
        warn!(offer = %offer.id, state = ?OfferState::Expired, "offer expired, listing reopened");
        Err(ExchangeError::not_found(offer.id))
    }
}
