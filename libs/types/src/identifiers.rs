//! Typed Identifier System - Zero-Cost Wrappers for Exchange Records
//!
//! Provides type-safe wrappers for the identifiers flowing through the
//! exchange subsystem so a batch id, an offer id, and an instance key can
//! never be confused at a call site. All wrappers are transparent over their
//! inner representation and serialize without overhead.
//!
//! ## Identifier Kinds
//!
//! - [`BatchId`] - creator-issued asset batch (non-zero u64)
//! - [`InstanceKey`] - a single numbered unit: `(batch, serial)`, ordered so
//!   two-record transactions can lock deterministically
//! - [`OfferId`] - an ephemeral exchange offer (store-allocated u64)
//! - [`WalletAddress`] - a 20-byte wallet address, rendered as 0x-hex
//!
//! ```rust
//! use types::{BatchId, InstanceKey, WalletAddress};
//!
//! let batch = BatchId::new(7).unwrap();
//! let key = InstanceKey::new(batch, 42);
//! let alice: WalletAddress = "0x00000000000000000000000000000000000000a1".parse().unwrap();
//!
//! // Type-safe signatures prevent swapping a batch id for a serial
//! fn lookup(key: InstanceKey, owner: WalletAddress) { let _ = (key, owner); }
//! lookup(key, alice);
//! ```

use crate::errors::IdentifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a creator-issued asset batch. Zero is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(u64);

impl BatchId {
    /// Create a validated batch id; zero is rejected.
    pub fn new(value: u64) -> Result<Self, IdentifierError> {
        if value == 0 {
            return Err(IdentifierError::NullId);
        }
        Ok(Self(value))
    }

    /// Access the raw u64 for storage layers that need it.
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one numbered unit within a batch.
///
/// Serials are 1-based and bounded by the batch's `total_supply`. The derived
/// ordering (batch first, then serial) is relied on by the record store to
/// acquire two-record locks in a deterministic order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct InstanceKey {
    pub batch: BatchId,
    pub serial: u32,
}

impl InstanceKey {
    pub fn new(batch: BatchId, serial: u32) -> Self {
        Self { batch, serial }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.batch, self.serial)
    }
}

/// Identifier of an ephemeral exchange offer, allocated by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(u64);

impl OfferId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offer-{}", self.0)
    }
}

/// A verified 20-byte wallet address.
///
/// Always displayed as lowercase 0x-prefixed hex. Parsing accepts an optional
/// `0x` prefix and requires exactly 40 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress([u8; 20]);

impl WalletAddress {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn from_hex(input: &str) -> Result<Self, IdentifierError> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        if digits.len() != 40 {
            return Err(IdentifierError::InvalidAddress {
                input: input.to_string(),
            });
        }
        let raw = hex::decode(digits).map_err(|_| IdentifierError::InvalidAddress {
            input: input.to_string(),
        })?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self)
    }
}

impl FromStr for WalletAddress {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}
