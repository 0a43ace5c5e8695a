//! `GET /oauth/access_token`.
//!
//! Final handshake step: the authorized request token plus its verifier are
//! exchanged for an access token. The spent request token is invalidated.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::extract;
use crate::handlers::{TEXT_PLAIN, credentials_body};
use crate::state::AppState;

pub(crate) async fn access_token(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<impl IntoResponse, ServerError> {
    let signed = extract::signed_request(&state.scheme, request).await?;
    let token = state.provider.exchange(&signed).await?;
    Ok((
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        credentials_body(&token.key, &token.secret),
    ))
}
