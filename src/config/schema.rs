//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::pattern::PatternOptions;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrailConfig {
    /// Listener configuration for the demo server.
    pub listener: ListenerConfig,

    /// Pattern matching behaviour.
    pub matching: MatchingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Pattern matching configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Match literal path text case-sensitively.
    pub case_sensitive: bool,

    /// Reject a trailing slash the pattern does not spell out.
    pub strict: bool,

    /// Percent-decode captured parameters.
    pub decode: bool,

    /// Cache compiled patterns across dispatches.
    pub cache_patterns: bool,
}

impl MatchingConfig {
    /// Options handed to the pattern compiler.
    pub fn pattern_options(&self) -> PatternOptions {
        PatternOptions {
            case_sensitive: self.case_sensitive,
            strict: self.strict,
            decode: self.decode,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let options = PatternOptions::default();
        Self {
            case_sensitive: options.case_sensitive,
            strict: options.strict,
            decode: options.decode,
            cache_patterns: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
