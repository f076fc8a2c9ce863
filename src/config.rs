//! Configuration management for the Cluster anchoring server

use serde::Deserialize;
use std::env;

use crate::anchoring::DEFAULT_ANCHOR_CACHE_SIZE;
use crate::selectors::DEFAULT_CONTEXT_LENGTH;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub annotations: AnnotationConfig,
    pub anchoring: AnchoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationConfig {
    /// Prefix for file and study IRIs in exported JSON-LD
    pub public_base_url: String,
    pub include_research_context: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnchoringConfig {
    /// Characters of prefix/suffix captured with new quote selectors
    pub context_length: usize,
    /// Entries kept by the anchor cache
    pub cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            annotations: AnnotationConfig {
                public_base_url: "http://localhost:3000".to_string(),
                include_research_context: true,
            },
            anchoring: AnchoringConfig {
                context_length: DEFAULT_CONTEXT_LENGTH,
                cache_size: DEFAULT_ANCHOR_CACHE_SIZE,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            annotations: AnnotationConfig {
                public_base_url: env::var("PUBLIC_BASE_URL")
                    .unwrap_or(defaults.annotations.public_base_url),
                include_research_context: env::var("INCLUDE_RESEARCH_CONTEXT")
                    .ok()
                    .and_then(|v| parse_flag(&v))
                    .unwrap_or(defaults.annotations.include_research_context),
            },
            anchoring: AnchoringConfig {
                context_length: env::var("ANCHOR_CONTEXT_LENGTH")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.anchoring.context_length),
                cache_size: env::var("ANCHOR_CACHE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.anchoring.cache_size),
            },
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!("Ignoring unrecognised boolean setting: {}", value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.anchoring.context_length, 50);
        assert!(config.annotations.include_research_context);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
