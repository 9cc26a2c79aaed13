//! Browse service behavior: holdings matching, text filtering, caller
//! exclusion, and pagination stability across pages.

use fixtures::{addr, key, world, BOB};
use exchange::BrowseQuery;
use std::collections::BTreeSet;
use types::InstanceKey;

#[tokio::test]
async fn matches_my_holdings_includes_open_to_any() {
    // Scenario E: dave holds 2#2 (W). alice's listing wants W, bob's is open
    // to any, carol's wants 1#2 only.
    let w = world();
    w.service
        .create_listing("alice", key(1, 1), BTreeSet::from([key(2, 2)]))
        .await
        .unwrap();
    w.service
        .create_listing("bob", key(1, 2), BTreeSet::new())
        .await
        .unwrap();
    w.service
        .create_listing("carol", key(2, 1), BTreeSet::from([key(1, 2)]))
        .await
        .unwrap();

    let page = w
        .service
        .browse_open_listings(
            "dave",
            BrowseQuery {
                matches_my_holdings: true,
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();

    let keys: Vec<InstanceKey> = page.items.iter().map(|i| i.key).collect();
    assert_eq!(page.total_items, 2);
    assert!(keys.contains(&key(1, 1)), "exact desired match included");
    assert!(keys.contains(&key(1, 2)), "open-to-any counts as a match");
    assert!(!keys.contains(&key(2, 1)), "non-intersecting listing excluded");
}

#[tokio::test]
async fn browse_never_shows_the_callers_instances() {
    let w = world();
    w.service
        .create_listing("bob", key(1, 2), BTreeSet::new())
        .await
        .unwrap();
    w.service
        .create_listing("carol", key(2, 1), BTreeSet::new())
        .await
        .unwrap();

    let page = w
        .service
        .browse_open_listings("bob", BrowseQuery::default(), 0, 10)
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].key, key(2, 1));
    assert!(!page.items[0].is_owned_by(&addr(BOB)));
}

#[tokio::test]
async fn text_filter_is_case_insensitive_over_batch_metadata() {
    let w = world();
    w.service
        .create_listing("bob", key(1, 2), BTreeSet::new())
        .await
        .unwrap();
    w.service
        .create_listing("carol", key(2, 1), BTreeSet::new())
        .await
        .unwrap();

    for needle in ["ESPRESSO", "beanhouse", "Coffee"] {
        let page = w
            .service
            .browse_open_listings(
                "dave",
                BrowseQuery {
                    text: Some(needle.into()),
                    ..Default::default()
                },
                0,
                10,
            )
            .await
            .unwrap();
        assert_eq!(page.total_items, 1, "needle {needle:?}");
        assert_eq!(page.items[0].key, key(1, 2));
    }

    let page = w
        .service
        .browse_open_listings(
            "dave",
            BrowseQuery {
                text: Some("sushi".into()),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(page.total_items, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn pages_partition_the_result_set() {
    let w = world();
    // bob lists a stack of coffee cards
    for serial in 3..=9u32 {
        w.store
            .seed_instance(key(1, serial), Some(addr(BOB)))
            .unwrap();
        w.service
            .create_listing("bob", key(1, serial), BTreeSet::new())
            .await
            .unwrap();
    }

    let mut seen: Vec<InstanceKey> = Vec::new();
    let mut page_index = 0;
    loop {
        let page = w
            .service
            .browse_open_listings("dave", BrowseQuery::default(), page_index, 3)
            .await
            .unwrap();
        assert_eq!(page.total_items, 7);
        assert_eq!(page.total_pages, 3);
        if page.items.is_empty() {
            break;
        }
        seen.extend(page.items.iter().map(|i| i.key));
        page_index += 1;
    }

    // Pages are disjoint and cover every listing exactly once
    let mut deduped = seen.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), seen.len(), "no instance appears on two pages");
    assert_eq!(seen.len(), 7);
}

#[tokio::test]
async fn my_listings_reports_open_and_pending_only() {
    let w = world();
    w.service
        .create_listing("carol", key(2, 1), BTreeSet::new())
        .await
        .unwrap();
    w.service
        .create_listing("dave", key(2, 2), BTreeSet::new())
        .await
        .unwrap();
    // dave's listing goes pending under carol's proposal
    w.service
        .propose_swap("carol", key(2, 2), key(2, 1))
        .await
        .unwrap();

    let daves = w.service.list_my_listings("dave").await.unwrap();
    assert_eq!(daves.len(), 1);
    assert_eq!(daves[0].key, key(2, 2));

    // carol's own instance is listed Open and still hers
    let carols = w.service.list_my_listings("carol").await.unwrap();
    assert_eq!(carols.len(), 1);
    assert_eq!(carols[0].key, key(2, 1));

    // bob never listed anything
    assert!(w.service.list_my_listings("bob").await.unwrap().is_empty());
}
