//! `GET /oauth/authorize`.
//!
//! Human-facing step: binds a verifier to the request token and sends the
//! user back to the client's callback. A real deployment authenticates the
//! user first; wire that in by fronting this route with a login layer.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use signet_core::{AuthError, oauth_encode};

use crate::error::ServerError;
use crate::handlers::TEXT_PLAIN;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct AuthorizeParams {
    oauth_token: Option<String>,
}

pub(crate) async fn authorize(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthorizeParams>,
) -> Result<Response, ServerError> {
    let token_key = params
        .oauth_token
        .ok_or(ServerError::Auth(AuthError::PartialOAuthRequest {
            missing: vec!["oauth_token"],
        }))?;
    let authorization = state.provider.authorize(&token_key, None).await?;

    match authorization.redirect {
        Some(url) => Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response()),
        None => {
            // Out-of-band token: no redirect target. Present the verifier to
            // the user directly.
            let verifier = authorization.token.verifier.unwrap_or_default();
            let body = format!(
                "oauth_token={}&oauth_verifier={}",
                oauth_encode(&authorization.token.key),
                oauth_encode(&verifier)
            );
            Ok(([(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response())
        }
    }
}
