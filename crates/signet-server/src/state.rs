//! Application state.
//!
//! Shared state for all request handlers.

use signet_core::OAuthProvider;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// The provider engine (store, replay guard, verification).
    pub(crate) provider: OAuthProvider,
    /// Scheme for rebuilding signed URLs.
    pub(crate) scheme: String,
    /// Advisory realm for `WWW-Authenticate` responses.
    pub(crate) realm: String,
    /// Whether the debug endpoints are routed.
    pub(crate) debug_endpoints: bool,
}
