//! Shared fixtures for the exchange integration suite.
//!
//! Builds a small world of merchants, batches, and holders so the scenario
//! tests can speak in terms of people instead of byte arrays: alice holds
//! coffee card 1#1, bob 1#2, carol 2#1, dave 2#2, and each has a session
//! credential named after them.

use exchange::{ExchangeConfig, ExchangeService, StaticTokenIdentity};
use asset_store::{AssetRecordStore, InMemoryStore};
use std::sync::Arc;
use types::{AssetBatch, AssetInstance, BatchId, InstanceKey, WalletAddress};

pub fn addr(byte: u8) -> WalletAddress {
    WalletAddress::new([byte; 20])
}

pub fn key(batch: u64, serial: u32) -> InstanceKey {
    InstanceKey::new(BatchId::new(batch).unwrap(), serial)
}

pub const ALICE: u8 = 0xa1;
pub const BOB: u8 = 0xb2;
pub const CAROL: u8 = 0xc3;
pub const DAVE: u8 = 0xd4;

pub fn coffee_batch() -> AssetBatch {
    AssetBatch {
        id: BatchId::new(1).unwrap(),
        name: "Espresso punch card".into(),
        category: "coffee".into(),
        merchant: "Beanhouse Roasters".into(),
        description: "ten free espressos at any branch".into(),
        image_ref: Some("img/espresso.png".into()),
        expires_at_ms: None,
        total_supply: 20,
        creator: addr(0xe1),
    }
}

pub fn gym_batch() -> AssetBatch {
    AssetBatch {
        id: BatchId::new(2).unwrap(),
        name: "Climbing gym day pass".into(),
        category: "fitness".into(),
        merchant: "Ironworks Bouldering".into(),
        description: "one day of unlimited climbing".into(),
        image_ref: None,
        expires_at_ms: None,
        total_supply: 20,
        creator: addr(0xe2),
    }
}

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub identity: Arc<StaticTokenIdentity>,
    pub service: Arc<ExchangeService<InMemoryStore, StaticTokenIdentity>>,
}

/// Seed the standard cast and wire up a service with the given config.
pub fn world_with_config(config: ExchangeConfig) -> World {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let store = Arc::new(InMemoryStore::new());
    store.register_batch(coffee_batch()).unwrap();
    store.register_batch(gym_batch()).unwrap();
    store.seed_instance(key(1, 1), Some(addr(ALICE))).unwrap();
    store.seed_instance(key(1, 2), Some(addr(BOB))).unwrap();
    store.seed_instance(key(2, 1), Some(addr(CAROL))).unwrap();
    store.seed_instance(key(2, 2), Some(addr(DAVE))).unwrap();

    let identity = Arc::new(StaticTokenIdentity::new());
    identity.grant("alice", addr(ALICE));
    identity.grant("bob", addr(BOB));
    identity.grant("carol", addr(CAROL));
    identity.grant("dave", addr(DAVE));

    let service = Arc::new(ExchangeService::new(
        store.clone(),
        identity.clone(),
        config,
    ));
    World {
        store,
        identity,
        service,
    }
}

pub fn world() -> World {
    world_with_config(ExchangeConfig::default())
}

/// Every instance with a live listing must have an owner.
pub async fn assert_listing_owner_invariant(world: &World) {
    for batch in 1..=2u64 {
        for serial in 1..=20u32 {
            if let Some(instance) = world.store.instance(key(batch, serial)).await {
                assert_listed_implies_owned(&instance);
            }
        }
    }
}

pub fn assert_listed_implies_owned(instance: &AssetInstance) {
    if instance.listing.is_some() {
        assert!(
            instance.owner.is_some(),
            "instance {} is listed but unowned",
            instance.key
        );
    }
}
