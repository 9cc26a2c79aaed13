//! # PerkSwap Exchange Service - Peer-to-Peer Instance Swapping
//!
//! ## Purpose
//!
//! The exchange subsystem for uniquely-owned, serially-numbered asset
//! instances: owners list an instance with acceptance criteria, counter
//! parties propose pairings, and the coordinator settles mutual ownership
//! transfers with optimistic concurrency so no partial swap is ever
//! observable.
//!
//! ## Integration Points
//!
//! - **Input Sources**: caller credentials via [`IdentityProvider`],
//!   instance/offer identifiers from the caller
//! - **State Access**: every mutation goes through the
//!   [`asset_store::AssetRecordStore`] conditional-update interface; no
//!   component holds a long-lived mutable cache of ownership
//! - **Output Destinations**: typed results and the [`types::ExchangeError`]
//!   taxonomy; `Conflict` is the only retryable kind
//!
//! ## Architecture Role
//!
//! ```text
//! Caller Credential → [Identity Provider] → Wallet Address
//!        ↓                                       ↓
//! [Listing Manager]  [Exchange Coordinator]  [Browse Service]
//!        ↓                    ↓                   ↓
//!   create/cancel      propose/resolve      browse/my-listings
//!        └──────────── [Asset Record Store] ─────┘
//!                 conditional updates on `version`
//! ```
//!
//! Operations are short, non-blocking units of work dispatched per request;
//! conflicts are detected optimistically, never prevented by locking across
//! requests.

pub mod browse;
pub mod config;
pub mod coordinator;
pub mod identity;
pub mod listings;
pub mod matcher;
pub mod service;

pub use browse::{BrowseQuery, BrowseService};
pub use config::ExchangeConfig;
pub use coordinator::ExchangeCoordinator;
pub use identity::{IdentityProvider, StaticTokenIdentity};
pub use listings::ListingManager;
pub use matcher::is_acceptable;
pub use service::ExchangeService;

/// Current unix time in milliseconds; listing order and offer TTLs both key
/// off this clock.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
