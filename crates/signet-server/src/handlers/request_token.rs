//! `GET /oauth/request_token`.
//!
//! Entry point of the handshake: a request signed with the consumer key
//! alone (no token secret) yields a fresh request token.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::extract;
use crate::handlers::{TEXT_PLAIN, credentials_body};
use crate::state::AppState;

pub(crate) async fn request_token(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<impl IntoResponse, ServerError> {
    let signed = extract::signed_request(&state.scheme, request).await?;
    let token = state.provider.issue_request_token(&signed).await?;
    Ok((
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        credentials_body(&token.key, &token.secret),
    ))
}
