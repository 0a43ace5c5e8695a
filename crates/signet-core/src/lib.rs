//! OAuth 1.0a provider core.
//!
//! This crate contains the protocol engine: credential model, signature
//! construction and verification (HMAC-SHA1 and PLAINTEXT), nonce/timestamp
//! replay defense, the three-step handshake state machine, and per-request
//! authentication. It depends only on the abstract [`CredentialStore`]
//! trait and never touches the transport; the HTTP layer lives in
//! `signet-server`.
//!
//! # Architecture
//!
//! ```text
//! inbound request ──► SignedRequest (transport-neutral descriptor)
//!                          │
//!                          ▼
//!                     OAuthProvider
//!                          │
//!                          ├─► ReplayGuard (nonce + timestamp, shared)
//!                          ├─► SignatureMethod (base string, verify)
//!                          └─► dyn CredentialStore (async lookups/writes)
//! ```
//!
//! # Handshake
//!
//! `issue_request_token` → `authorize` → `exchange`, after which the access
//! token signs protected-resource requests checked by `authenticate`. Each
//! verifying step runs the same ordered pipeline: required parameters,
//! nonce replay, timestamp freshness, method resolution, signature check.

pub mod error;
pub mod memory;
pub mod nonce;
pub mod provider;
pub mod request;
pub mod signature;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use memory::MemoryStore;
pub use nonce::{DEFAULT_NONCE_CAPACITY, DEFAULT_TIMESTAMP_WINDOW_SECS, NonceKey, ReplayGuard};
pub use provider::{Authorization, OAuthProvider, Principal};
pub use request::{REQUIRED_OAUTH_PARAMS, SignedRequest};
pub use signature::{SignatureMethod, oauth_encode, signing_base_string, signing_key};
pub use store::{CredentialStore, StoreError, StoreErrorKind};
pub use token::{AccessToken, Consumer, RequestToken, VerifierGenerator};
