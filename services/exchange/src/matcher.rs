//! Acceptance Matching
//!
//! Pure predicate deciding whether a candidate instance satisfies a listing's
//! acceptance criteria. Evaluated one-directionally: only the target
//! listing's criteria matter, the offered instance's own listing state is
//! irrelevant (the offering party merely has to own it).

use types::{InstanceKey, Listing};

/// True iff the listing's desired set is empty (open to any instance) or
/// contains the offered instance.
pub fn is_acceptable(listing: &Listing, offered: InstanceKey) -> bool {
    listing.desired.is_empty() || listing.desired.contains(&offered)
}
