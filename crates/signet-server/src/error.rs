//! Error mapping from core failures to HTTP responses.
//!
//! Response bodies stay generic; diagnostic detail (expected base string,
//! missing parameter names) goes to server logs only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use signet_core::AuthError;

/// Handler-level error.
#[derive(Debug)]
pub(crate) enum ServerError {
    /// A core verification or handshake failure.
    Auth(AuthError),
    /// The request could not be normalized (bad query/body encoding).
    MalformedRequest(&'static str),
}

impl From<AuthError> for ServerError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::MalformedRequest(what) => {
                tracing::warn!(what, "failed to parse request parameters");
                (StatusCode::BAD_REQUEST, "malformed request").into_response()
            }
            Self::Auth(err) => auth_response(&err),
        }
    }
}

fn auth_response(err: &AuthError) -> Response {
    match err {
        // The provider endpoints have no anonymous fallback, so "no OAuth
        // parameters at all" is a plain bad request there.
        AuthError::NotAnOAuthRequest => {
            return (StatusCode::BAD_REQUEST, "not an OAuth request").into_response();
        }
        AuthError::Store(store) => {
            tracing::error!(error = %store, "credential store failure");
            return (StatusCode::SERVICE_UNAVAILABLE, "service unavailable").into_response();
        }
        AuthError::PartialOAuthRequest { missing } => {
            tracing::warn!(?missing, "OAuth request missing required parameters");
        }
        AuthError::InvalidSignature { expected_base } => {
            tracing::warn!(expected_base = %expected_base, "signature verification failed");
        }
        AuthError::StaleTimestamp { detail } => {
            tracing::warn!(detail = %detail, "stale timestamp");
        }
        AuthError::UnknownSignatureMethod { method } => {
            tracing::warn!(method = %method, "unknown signature method");
        }
        other => {
            tracing::warn!(error = %other, "OAuth authentication failed");
        }
    }
    // The Display string is the generic message; field detail never
    // reaches the caller.
    (StatusCode::UNAUTHORIZED, err.to_string()).into_response()
}
