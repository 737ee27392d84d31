//! Application startup and lifecycle management.
//!
//! Builds the HTTP router (API routes, CORS, tracing, static assets) and runs
//! it until a shutdown signal arrives.

use crate::config::RelayConfig;
use crate::handlers::{
    generate::generate, health::health_check, metrics::metrics, models::list_models,
};
use crate::services::providers::deepseek::DeepSeekProvider;
use crate::services::providers::ChatProvider;
use crate::services::{CredentialSource, EnvCredential, GenerationRelay, HealthReporter};
use axum::{
    http::{header, Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: GenerationRelay,
    pub health: HealthReporter,
}

impl AppState {
    pub fn new(provider: Arc<dyn ChatProvider>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            relay: GenerationRelay::new(provider, credentials.clone()),
            health: HealthReporter::new(credentials),
        }
    }
}

/// Permissive CORS: any origin, GET/POST/OPTIONS, `Content-Type` header.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/health", get(health_check))
        .route("/api/models", get(list_models))
        .route("/metrics", get(metrics))
        .fallback_service(assets)
        .layer(cors_layer())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let provider = DeepSeekProvider::new(config.upstream.provider_config())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let credentials = EnvCredential::new(config.upstream.api_key_var.clone());

        tracing::info!(
            base_url = %config.upstream.base_url,
            credential_var = %config.upstream.api_key_var,
            credential_set = credentials.credential().is_some(),
            "Initialized upstream chat provider"
        );

        let state = AppState::new(Arc::new(provider), Arc::new(credentials));
        Self::with_state(config, state).await
    }

    /// Build the application around an existing state, e.g. one with a mock provider.
    pub async fn with_state(config: RelayConfig, state: AppState) -> Result<Self, AppError> {
        if !config.static_dir.is_dir() {
            tracing::warn!(
                static_dir = %config.static_dir.display(),
                "Static asset directory not found; non-API paths will return 404"
            );
        }
        let router = build_router(state, &config.static_dir);

        // Port 0 = random port for testing
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Relay service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
