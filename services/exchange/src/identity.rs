//! Identity Provider Seam
//!
//! The exchange treats identity resolution as an opaque, already-verified
//! external service: a credential goes in, a wallet address comes out. How
//! the credential was produced (session cookie, signed nonce) is out of
//! scope here.

use async_trait::async_trait;
use dashmap::DashMap;
use types::{ExchangeError, WalletAddress};

/// Resolves a caller credential to a verified wallet address.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_caller(&self, credential: &str) -> Result<WalletAddress, ExchangeError>;
}

/// Token-table identity provider for tests and single-process deployments.
///
/// Holds a credential -> address map that a sign-in flow elsewhere would
/// populate.
pub struct StaticTokenIdentity {
    sessions: DashMap<String, WalletAddress>,
}

impl StaticTokenIdentity {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Bind a credential to a wallet address.
    pub fn grant(&self, credential: impl Into<String>, address: WalletAddress) {
        self.sessions.insert(credential.into(), address);
    }

    /// Drop a credential binding.
    pub fn revoke(&self, credential: &str) {
        self.sessions.remove(credential);
    }
}

impl Default for StaticTokenIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentity {
    async fn resolve_caller(&self, credential: &str) -> Result<WalletAddress, ExchangeError> {
        self.sessions
            .get(credential)
            .map(|entry| *entry.value())
            .ok_or_else(|| ExchangeError::Auth {
                reason: "unknown or revoked credential".into(),
            })
    }
}
