//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Keep the resolver budget inside the HTTP request timeout, so a slow
//!   lookup ends as 404 rather than the timeout layer's 408
//! - Check provider base URLs are absolute http(s) URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroDuration(String),

    #[error(
        "resolver.timeout_ms ({timeout_ms}) must be below listener.request_timeout_secs ({request_timeout_secs}s)"
    )]
    ResolverOutlastsRequest {
        timeout_ms: u64,
        request_timeout_secs: u64,
    },

    #[error("at least one provider must be configured")]
    NoProviders,

    #[error("provider '{name}' has invalid base_url: {reason}")]
    InvalidProviderUrl { name: String, reason: String },

    #[error("observability.log_level '{0}' is not a valid filter")]
    InvalidLogLevel(String),
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration(
            "listener.request_timeout_secs".into(),
        ));
    }
    if config.resolver.timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration("resolver.timeout_ms".into()));
    }
    let request_timeout_ms = config.listener.request_timeout_secs.saturating_mul(1000);
    if request_timeout_ms > 0 && config.resolver.timeout_ms >= request_timeout_ms {
        errors.push(ValidationError::ResolverOutlastsRequest {
            timeout_ms: config.resolver.timeout_ms,
            request_timeout_secs: config.listener.request_timeout_secs,
        });
    }

    if config.providers.is_empty() {
        errors.push(ValidationError::NoProviders);
    }
    for provider in &config.providers {
        let name = provider.display_name().to_string();
        match url::Url::parse(&provider.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            Ok(url) => errors.push(ValidationError::InvalidProviderUrl {
                name: name.clone(),
                reason: format!("unsupported url '{}'", url),
            }),
            Err(e) => errors.push(ValidationError::InvalidProviderUrl {
                name: name.clone(),
                reason: e.to_string(),
            }),
        }
        if provider.request_timeout_ms == 0 {
            errors.push(ValidationError::ZeroDuration(format!(
                "providers.{}.request_timeout_ms",
                name
            )));
        }
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
