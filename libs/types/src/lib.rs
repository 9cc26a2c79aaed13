//! # PerkSwap Type System - Exchange Domain Model and Typed Identifiers
//!
//! ## Purpose
//!
//! Unified type system for the peer-to-peer swap subsystem: typed identifiers
//! that make batch/serial/offer confusion a compile error, the asset domain
//! model with tagged listing and offer state machines, and the operation
//! error taxonomy shared by every component.
//!
//! ## Integration Points
//!
//! - **Record Store**: `AssetInstance` is the unit of conditional updates;
//!   its `version` field is the sole optimistic-concurrency coordination point
//! - **Listing Manager / Coordinator**: mutate `owner` and `listing` through
//!   the store, never directly
//! - **Browse Service**: reads `AssetBatch` metadata for text filtering
//! - **Callers**: consume [`ExchangeError`] results; only `Conflict` retries

pub mod asset;
pub mod errors;
pub mod identifiers;

pub use asset::{
    AssetBatch, AssetInstance, ExchangeOffer, Listing, ListingState, OfferState, SwapDecision,
};
pub use errors::{ExchangeError, IdentifierError};
pub use identifiers::{BatchId, InstanceKey, OfferId, WalletAddress};
