//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::resolver::RacePolicy;

/// Root configuration for the address service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Race settings.
    pub resolver: ResolverConfig,

    /// Upstream providers raced for every lookup.
    pub providers: Vec<ProviderConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            resolver: ResolverConfig::default(),
            providers: default_providers(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8084").
    pub bind_address: String,

    /// Upper bound for a whole HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8084".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Budget for one resolution in milliseconds.
    pub timeout_ms: u64,

    /// How provider failures affect the race.
    pub policy: RacePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            policy: RacePolicy::FailFast,
        }
    }
}

/// Upstream schema a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    ViaCep,
    BrasilApi,
}

impl ProviderKind {
    pub fn default_name(&self) -> &'static str {
        match self {
            ProviderKind::ViaCep => "viacep",
            ProviderKind::BrasilApi => "brasilapi",
        }
    }
}

/// Upstream provider definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Schema and URL layout of the upstream.
    pub kind: ProviderKind,

    /// Name for logs (defaults to the kind).
    #[serde(default)]
    pub name: Option<String>,

    /// Scheme and host of the upstream (e.g., "http://viacep.com.br").
    pub base_url: String,

    /// Per-call timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ProviderConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.default_name())
    }
}

fn default_request_timeout_ms() -> u64 {
    5000
}

/// The two public CEP services.
pub fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            kind: ProviderKind::ViaCep,
            name: None,
            base_url: "http://viacep.com.br".to_string(),
            request_timeout_ms: default_request_timeout_ms(),
        },
        ProviderConfig {
            kind: ProviderKind::BrasilApi,
            name: None,
            base_url: "http://brasilapi.com.br".to_string(),
            request_timeout_ms: default_request_timeout_ms(),
        },
    ]
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8084");
        assert_eq!(config.resolver.timeout_ms, 1000);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[0].kind, ProviderKind::ViaCep);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [resolver]
            policy = "first_success"
            "#,
        )
        .unwrap();

        assert_eq!(config.resolver.policy, RacePolicy::FirstSuccess);
        assert_eq!(config.resolver.timeout_ms, 1000);
        assert_eq!(config.providers.len(), 2);
    }

    #[test]
    fn test_provider_table() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [[providers]]
            kind = "brasil_api"
            name = "brasilapi-mirror"
            base_url = "http://127.0.0.1:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].display_name(), "brasilapi-mirror");
        assert_eq!(config.providers[0].request_timeout_ms, 5000);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }
}
