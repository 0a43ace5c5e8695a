//! `GET /oauth/register_application` (debug only).
//!
//! Mints a consumer so the handshake can be exercised against an empty
//! store. Routed only when debug endpoints are enabled.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use signet_core::AuthError;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for the debug registration endpoint.
#[derive(Serialize)]
pub(crate) struct RegisteredConsumer {
    key: String,
    secret: String,
}

pub(crate) async fn register_application(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RegisteredConsumer>, ServerError> {
    let consumer = state
        .provider
        .store()
        .add_consumer(None, None)
        .await
        .map_err(AuthError::from)?;
    tracing::info!(consumer_key = %consumer.key, "registered debug consumer");
    Ok(Json(RegisteredConsumer {
        key: consumer.key,
        secret: consumer.secret,
    }))
}
