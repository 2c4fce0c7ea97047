//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the lookup handlers
//! - Wire up middleware (tracing, request ID, request timeout)
//! - Swap in a new resolver when configuration reloads
//! - Serve until the shutdown signal fires

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::{HeaderName, Request},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, ServiceConfig};
use crate::http::handlers::{lookup_address, missing_postal_code};
use crate::lifecycle::ShutdownSignal;
use crate::resolver::AddressResolver;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ArcSwap<AddressResolver>>,
}

/// HTTP server exposing `GET /{cep}`.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    resolver: Arc<ArcSwap<AddressResolver>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, ConfigError> {
        let resolver = AddressResolver::from_config(&config.resolver, &config.providers)?;
        let resolver = Arc::new(ArcSwap::from_pointee(resolver));

        let state = AppState {
            resolver: resolver.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            resolver,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        });

        Router::new()
            .route("/", get(missing_postal_code))
            .route("/{cep}", get(lookup_address))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                    .layer(trace)
                    .layer(PropagateRequestIdLayer::new(request_id))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the resolver for
    /// subsequent requests. Returns once `shutdown` fires and in-flight
    /// requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            timeout_ms = self.config.resolver.timeout_ms,
            policy = %self.config.resolver.policy,
            providers = ?self.resolver.load().provider_names(),
            "HTTP server starting"
        );

        let resolver = self.resolver.clone();
        let reload = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                if let Err(errors) = validate_config(&new_config) {
                    tracing::error!(
                        error = %ConfigError::Validation(errors),
                        "Rejected configuration update, keeping current resolver"
                    );
                    continue;
                }
                match AddressResolver::from_config(&new_config.resolver, &new_config.providers) {
                    Ok(new_resolver) => {
                        tracing::info!(
                            timeout_ms = new_config.resolver.timeout_ms,
                            policy = %new_config.resolver.policy,
                            providers = ?new_resolver.provider_names(),
                            "Resolver configuration reloaded"
                        );
                        resolver.store(Arc::new(new_resolver));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to build resolver from new configuration");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reload.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Live handle to the resolver the handlers use; reloads show up here.
    pub fn resolver_handle(&self) -> Arc<ArcSwap<AddressResolver>> {
        self.resolver.clone()
    }
}
