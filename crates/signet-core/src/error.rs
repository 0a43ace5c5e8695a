//! Error taxonomy for OAuth verification and the handshake.
//!
//! `Display` strings are generic and safe to return to unauthenticated
//! callers. Diagnostic detail (expected base string, missing parameter
//! names) lives in variant fields and is only for server-side logs.

use crate::store::StoreError;

/// Authentication or protocol failure.
///
/// Every failure is terminal for the request: the client's remedy (fresh
/// nonce and timestamp, corrected signature) happens on a new request.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The request carries no OAuth parameters at all. Benign: lets a
    /// resource handler fall through to anonymous access instead of
    /// treating the request as a failed authentication attempt.
    #[error("not an OAuth request")]
    NotAnOAuthRequest,

    /// Some OAuth parameters are present but required ones are missing.
    #[error("incomplete OAuth request")]
    PartialOAuthRequest {
        /// Names of the absent required parameters.
        missing: Vec<&'static str>,
    },

    /// Unsupported `oauth_signature_method` value.
    #[error("unknown signature method")]
    UnknownSignatureMethod {
        /// The method name the client sent.
        method: String,
    },

    /// The nonce was already observed for this consumer/token scope.
    #[error("nonce already used")]
    NonceReplayed,

    /// `oauth_timestamp` is outside the freshness window (or unparseable).
    #[error("timestamp outside the freshness window")]
    StaleTimestamp {
        /// Log-only description of the rejected value.
        detail: String,
    },

    /// Signature verification failed.
    #[error("invalid signature")]
    InvalidSignature {
        /// The base string the server signed; never echoed to the caller.
        expected_base: String,
    },

    /// `oauth_verifier` is absent, does not match the bound value, or the
    /// request token it refers to is already spent.
    #[error("invalid or missing verifier")]
    InvalidVerifier,

    /// No `oauth_callback` was supplied and the consumer has none registered.
    #[error("missing callback")]
    MissingCallback,

    /// Consumer or token lookup came back empty, or the token does not
    /// belong to the presenting consumer.
    #[error("unknown credentials")]
    UnknownCredentials,

    /// Bad credential construction (empty key or secret).
    #[error("invalid credential configuration")]
    Configuration {
        /// What was wrong with the construction.
        detail: &'static str,
    },

    /// Credential store failure. Retryable by the caller; never an
    /// authentication verdict.
    #[error("credential store unavailable")]
    Store(#[from] StoreError),
}
