//! `GET /oauth/echo` (debug only).
//!
//! A protected resource exercising the full authentication path: a request
//! signed with an access token gets back the identity the provider resolved.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::response::IntoResponse;
use signet_core::oauth_encode;

use crate::error::ServerError;
use crate::extract;
use crate::handlers::TEXT_PLAIN;
use crate::state::AppState;

pub(crate) async fn echo(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<impl IntoResponse, ServerError> {
    let signed = extract::signed_request(&state.scheme, request).await?;
    let principal = state.provider.authenticate(&signed).await?;
    let token_key = principal.token.map(|t| t.key).unwrap_or_default();
    Ok((
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        format!(
            "consumer={}&token={}",
            oauth_encode(&principal.consumer.key),
            oauth_encode(&token_key)
        ),
    ))
}
