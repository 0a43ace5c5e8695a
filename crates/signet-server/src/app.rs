//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route(
            "/oauth/request_token",
            get(handlers::request_token::request_token),
        )
        .route("/oauth/authorize", get(handlers::authorize::authorize))
        .route(
            "/oauth/access_token",
            get(handlers::access_token::access_token),
        );

    // Debug-only surface: consumer registration and a protected echo.
    if state.debug_endpoints {
        router = router
            .route(
                "/oauth/register_application",
                get(handlers::register::register_application),
            )
            .route("/oauth/echo", get(handlers::echo::echo));
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            www_authenticate,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(security::no_store_layer()),
        )
        .with_state(state)
}

/// Attach `WWW-Authenticate: OAuth realm="..."` to authentication failures.
async fn www_authenticate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        let value = format!("OAuth realm=\"{}\"", state.realm);
        if let Ok(value) = HeaderValue::from_str(&value) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
    }
    response
}
