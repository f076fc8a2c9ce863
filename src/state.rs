//! Application state management

use std::sync::Arc;

use crate::anchoring::AnchorCache;
use crate::annotations::JsonLdOptions;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    anchor_cache: AnchorCache,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Self {
        let anchor_cache = AnchorCache::new(config.anchoring.cache_size);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                anchor_cache,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the anchor cache
    pub fn anchor_cache(&self) -> &AnchorCache {
        &self.inner.anchor_cache
    }

    /// JSON-LD export options derived from the configuration
    pub fn json_ld_options(&self) -> JsonLdOptions {
        JsonLdOptions {
            base_url: self.inner.config.annotations.public_base_url.clone(),
            include_research_context: self.inner.config.annotations.include_research_context,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
