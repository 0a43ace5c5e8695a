//! HTTP wire surface for the signet OAuth 1.0a provider.
//!
//! This crate exposes the three handshake endpoints over axum and maps core
//! failures to generic HTTP responses:
//!
//! - `GET /oauth/request_token` — issue a request token
//! - `GET /oauth/authorize` — bind a verifier, redirect to the callback
//! - `GET /oauth/access_token` — exchange for an access token
//!
//! With debug endpoints enabled, `GET /oauth/register_application` mints a
//! consumer and `GET /oauth/echo` exercises protected-resource
//! authentication.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use signet_core::MemoryStore;
//! use signet_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let store = Arc::new(MemoryStore::new());
//!     run_server(config, store).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use signet_core::{CredentialStore, OAuthProvider, ReplayGuard};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Scheme used to rebuild signed URLs ("http" or "https"). A
    /// `X-Forwarded-Proto` header from a fronting proxy overrides it
    /// per request.
    pub scheme: String,
    /// Advisory realm echoed in `WWW-Authenticate` responses.
    pub realm: String,
    /// Replay guard ring capacity.
    pub nonce_capacity: usize,
    /// Timestamp freshness window in seconds.
    pub timestamp_window_secs: u64,
    /// Expose the debug registration and echo endpoints.
    pub debug_endpoints: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
            scheme: "http".to_owned(),
            realm: String::new(),
            nonce_capacity: signet_core::DEFAULT_NONCE_CAPACITY,
            timestamp_window_secs: signet_core::DEFAULT_TIMESTAMP_WINDOW_SECS,
            debug_endpoints: false,
        }
    }
}

/// Build the application router over the given credential store.
///
/// The store is injected explicitly; the replay guard is constructed here
/// and owned by the router's state for the life of the process.
pub fn app(config: &ServerConfig, store: Arc<dyn CredentialStore>) -> Router {
    let replay = ReplayGuard::new(config.nonce_capacity, config.timestamp_window_secs);
    let state = Arc::new(AppState {
        provider: OAuthProvider::new(store, replay),
        scheme: config.scheme.clone(),
        realm: config.realm.clone(),
        debug_endpoints: config.debug_endpoints,
    });
    app::create_router(state)
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(
    config: ServerConfig,
    store: Arc<dyn CredentialStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = app(&config, store);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting OAuth provider");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a signet config.
#[must_use]
pub fn server_config_from_config(config: &signet_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        scheme: config.oauth.scheme.clone(),
        realm: config.oauth.realm.clone(),
        nonce_capacity: config.oauth.nonce_capacity,
        timestamp_window_secs: config.oauth.timestamp_window_secs,
        debug_endpoints: config.oauth.debug_endpoints,
    }
}
