//! Property-style invariants over the acceptance predicate and pagination.

use asset_store::{AssetRecordStore, InMemoryStore, ListingFilter, Page};
use fixtures::{addr, coffee_batch, key};
use proptest::prelude::*;
use std::collections::BTreeSet;
use types::{Listing, ListingState};

fn arbitrary_key() -> impl Strategy<Value = types::InstanceKey> {
    (1u64..5, 1u32..20).prop_map(|(batch, serial)| key(batch, serial))
}

proptest! {
    /// An empty desired set accepts every candidate; a non-empty one accepts
    /// exactly its members.
    #[test]
    fn acceptance_is_membership_or_open(
        desired in proptest::collection::btree_set(arbitrary_key(), 0..6),
        offered in arbitrary_key(),
    ) {
        let listing = Listing::open(desired.clone(), 0);
        let accepted = exchange::is_acceptable(&listing, offered);
        if desired.is_empty() {
            prop_assert!(accepted);
        } else {
            prop_assert_eq!(accepted, desired.contains(&offered));
        }
    }

    /// Offset pagination partitions the matching set: pages are disjoint,
    /// cover everything, and follow one stable order.
    #[test]
    fn pagination_partitions_the_listing_set(
        listed in 0usize..15,
        page_size in 1u32..7,
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let store = InMemoryStore::new();
            store.register_batch(coffee_batch()).unwrap();
            for serial in 0..listed {
                let k = key(1, serial as u32 + 1);
                store.seed_instance(k, Some(addr(0x10))).unwrap();
                store
                    .conditional_update(
                        k,
                        0,
                        Box::new(move |record| {
                            record.listing =
                                Some(Listing::open(BTreeSet::new(), (serial % 4) as i64))
                        }),
                    )
                    .await
                    .unwrap();
            }

            let filter = ListingFilter {
                states: vec![ListingState::Open],
                ..Default::default()
            };
            let full = store.query_listings(&filter, None).await;
            assert_eq!(full.total_items, listed);

            let mut collected = Vec::new();
            let mut index = 0;
            loop {
                let page = store
                    .query_listings(&filter, Some(Page { index, size: page_size }))
                    .await;
                assert_eq!(page.total_items, listed);
                assert_eq!(
                    page.total_pages,
                    (listed as u32).div_ceil(page_size)
                );
                if page.items.is_empty() {
                    break;
                }
                collected.extend(page.items);
                index += 1;
            }

            // Concatenated pages reproduce the unpaginated scan exactly
            assert_eq!(collected, full.items);
        });
    }
}
