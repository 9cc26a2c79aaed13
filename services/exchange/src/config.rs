//! Exchange Service Configuration
//!
//! Runtime parameters for the exchange components: the retry bound for the
//! propose path's read-validate-write cycle, browse pagination limits, and
//! the optional offer time-to-live. Supports JSON file loading and
//! environment variable overrides with validated, production-ready defaults.

use serde::{Deserialize, Serialize};

/// Complete configuration for the exchange service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Upper bound on read-validate-write retries when a proposal hits a
    /// version conflict; exhausting it surfaces `Conflict` to the caller
    pub max_swap_retries: u32,
    /// Page size applied when a browse request passes zero
    pub default_page_size: u32,
    /// Hard cap on requested page sizes
    pub max_page_size: u32,
    /// Offers older than this are lazily expired at resolution time;
    /// `None` disables expiry entirely
    pub offer_ttl_secs: Option<u64>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            max_swap_retries: 3,
            default_page_size: 20,
            max_page_size: 100,
            offer_ttl_secs: None,
        }
    }
}

impl ExchangeConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(retries) = std::env::var("PERKSWAP_MAX_SWAP_RETRIES") {
            if let Ok(value) = retries.parse::<u32>() {
                config.max_swap_retries = value;
            }
        }

        if let Ok(size) = std::env::var("PERKSWAP_DEFAULT_PAGE_SIZE") {
            if let Ok(value) = size.parse::<u32>() {
                config.default_page_size = value;
            }
        }

        if let Ok(size) = std::env::var("PERKSWAP_MAX_PAGE_SIZE") {
            if let Ok(value) = size.parse::<u32>() {
                config.max_page_size = value;
            }
        }

        if let Ok(ttl) = std::env::var("PERKSWAP_OFFER_TTL_SECS") {
            if let Ok(value) = ttl.parse::<u64>() {
                config.offer_ttl_secs = Some(value);
            }
        }

        config
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_swap_retries == 0 {
            anyhow::bail!("max_swap_retries must be at least 1");
        }

        if self.default_page_size == 0 {
            anyhow::bail!("default_page_size must be positive");
        }

        if self.max_page_size == 0 {
            anyhow::bail!("max_page_size must be positive");
        }

        if self.default_page_size > self.max_page_size {
            anyhow::bail!("default_page_size must not exceed max_page_size");
        }

        Ok(())
    }

    /// Clamp a caller-requested page size to the configured bounds.
    pub fn effective_page_size(&self, requested: u32) -> u32 {
        if requested == 0 {
            self.default_page_size
        } else {
            requested.min(self.max_page_size)
        }
    }
}
