//! Handshake orchestration and per-request authentication.
//!
//! [`OAuthProvider`] drives the three-step handshake (request token →
//! authorize → access token) and authenticates protected-resource requests.
//! Every verifying transition runs the same ordered pipeline: required
//! parameters, nonce replay, timestamp freshness, signature-method
//! resolution, signature verification. The ordering gives callers useful
//! diagnostics; no step is ever skipped.

use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::error::AuthError;
use crate::nonce::{NonceKey, ReplayGuard};
use crate::request::{REQUIRED_OAUTH_PARAMS, SignedRequest};
use crate::signature::{SignatureMethod, signing_base_string};
use crate::store::CredentialStore;
use crate::token::{AccessToken, Consumer, RequestToken};

/// Required parameters when a token accompanies the request.
const REQUIRED_WITH_TOKEN: [&str; 6] = [
    "oauth_consumer_key",
    "oauth_signature_method",
    "oauth_signature",
    "oauth_timestamp",
    "oauth_nonce",
    "oauth_token",
];

/// Authenticated identity attached to a verified request.
#[derive(Debug, Clone)]
pub struct Principal {
    /// The presenting consumer.
    pub consumer: Consumer,
    /// The access token, when the request carried one.
    pub token: Option<AccessToken>,
}

/// Outcome of the authorize step.
#[derive(Debug, Clone)]
pub struct Authorization {
    /// The request token with its freshly bound verifier.
    pub token: RequestToken,
    /// Redirect target, or `None` for out-of-band tokens: the caller
    /// presents the verifier to the user directly.
    pub redirect: Option<String>,
}

/// The OAuth 1.0a provider engine.
///
/// Stateless per request except for the replay guard. The store may suspend
/// on every call; the replay guard lock is released before any store call.
pub struct OAuthProvider {
    store: Arc<dyn CredentialStore>,
    replay: ReplayGuard,
}

impl OAuthProvider {
    /// Create a provider over a store and an explicitly constructed guard.
    pub fn new(store: Arc<dyn CredentialStore>, replay: ReplayGuard) -> Self {
        Self { store, replay }
    }

    /// The credential store this provider verifies against.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Step 1: issue a request token.
    ///
    /// The request is signed with the consumer key only; the token secret is
    /// absent from the signing key. `oauth_callback` is mandatory under
    /// 1.0a, with the consumer's registered callback as fallback.
    ///
    /// # Errors
    ///
    /// Any [`AuthError`] from the verification pipeline, or
    /// [`AuthError::MissingCallback`] when neither the request nor the
    /// consumer provides a callback.
    pub async fn issue_request_token(
        &self,
        request: &SignedRequest,
    ) -> Result<RequestToken, AuthError> {
        request.require(&REQUIRED_OAUTH_PARAMS)?;
        let consumer = self.consumer_for(request).await?;
        self.verify_signed(request, &consumer, None, None)?;
        let callback = resolve_callback(
            request.oauth_param("oauth_callback"),
            consumer.callback.as_deref(),
        )?;
        let token = self.store.add_request_token(&consumer.key, callback).await?;
        tracing::debug!(consumer_key = %consumer.key, token_key = %token.key, "issued request token");
        Ok(token)
    }

    /// Step 2: bind a verifier to an authorized request token.
    ///
    /// The authenticated end-user action itself happens in an external
    /// authorization UI; this binds the verifier (generated unless supplied)
    /// and computes the redirect target.
    ///
    /// # Errors
    ///
    /// [`AuthError::UnknownCredentials`] when the token does not exist.
    pub async fn authorize(
        &self,
        token_key: &str,
        verifier: Option<&str>,
    ) -> Result<Authorization, AuthError> {
        let mut token = self
            .store
            .get_request_token(token_key)
            .await?
            .ok_or(AuthError::UnknownCredentials)?;
        token.set_verifier(verifier);
        let token = self.store.save_request_token(token).await?;
        let redirect = token.callback_url();
        tracing::debug!(token_key = %token.key, redirect = redirect.is_some(), "authorized request token");
        Ok(Authorization { token, redirect })
    }

    /// Step 3: exchange an authorized request token for an access token.
    ///
    /// The request is signed with the consumer key and the request token;
    /// `oauth_verifier` must equal the bound value exactly. The spent
    /// request token is invalidated atomically, so a second exchange fails.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidVerifier`] for an absent or mismatched verifier,
    /// a request token that does not exist or belongs to another consumer,
    /// or a lost invalidation race; otherwise any pipeline error.
    pub async fn exchange(&self, request: &SignedRequest) -> Result<AccessToken, AuthError> {
        request.require(&REQUIRED_WITH_TOKEN)?;
        let consumer = self.consumer_for(request).await?;
        let token_key = request.oauth_param("oauth_token").unwrap_or_default();
        let token = self
            .store
            .get_request_token(token_key)
            .await?
            .ok_or(AuthError::InvalidVerifier)?;
        if token.consumer_key != consumer.key {
            return Err(AuthError::InvalidVerifier);
        }
        let presented = request
            .oauth_param("oauth_verifier")
            .ok_or(AuthError::InvalidVerifier)?;
        let bound = token.verifier.as_deref().ok_or(AuthError::InvalidVerifier)?;
        if !bool::from(bound.as_bytes().ct_eq(presented.as_bytes())) {
            return Err(AuthError::InvalidVerifier);
        }
        self.verify_signed(request, &consumer, Some(&token.key), Some(&token.secret))?;
        if !self.store.remove_request_token(&token.key).await? {
            // Another exchange spent the token first.
            return Err(AuthError::InvalidVerifier);
        }
        let access = self.store.add_access_token(&consumer.key).await?;
        tracing::debug!(consumer_key = %consumer.key, token_key = %access.key, "issued access token");
        Ok(access)
    }

    /// Authenticate a protected-resource request.
    ///
    /// Resolves the (consumer, access token) identity; callers treat the
    /// returned [`Principal`] as the authenticated identity for the duration
    /// of the request. There is no session state.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotAnOAuthRequest`] lets non-OAuth endpoints fall
    /// through to anonymous handling; everything else is a failed
    /// authentication attempt.
    pub async fn authenticate(&self, request: &SignedRequest) -> Result<Principal, AuthError> {
        request.require(&REQUIRED_WITH_TOKEN)?;
        let consumer = self.consumer_for(request).await?;
        let token_key = request.oauth_param("oauth_token").unwrap_or_default();
        let token = self
            .store
            .get_access_token(token_key)
            .await?
            .ok_or(AuthError::UnknownCredentials)?;
        if token.consumer_key != consumer.key {
            return Err(AuthError::UnknownCredentials);
        }
        self.verify_signed(request, &consumer, Some(&token.key), Some(&token.secret))?;
        Ok(Principal {
            consumer,
            token: Some(token),
        })
    }

    async fn consumer_for(&self, request: &SignedRequest) -> Result<Consumer, AuthError> {
        let key = request.oauth_param("oauth_consumer_key").unwrap_or_default();
        self.store
            .get_consumer(key)
            .await?
            .ok_or(AuthError::UnknownCredentials)
    }

    /// Ordered verification pipeline after the presence check: nonce replay,
    /// timestamp freshness, method resolution, signature verification.
    /// Synchronous by construction, so the replay lock cannot be held across
    /// a store call.
    fn verify_signed(
        &self,
        request: &SignedRequest,
        consumer: &Consumer,
        token_key: Option<&str>,
        token_secret: Option<&str>,
    ) -> Result<(), AuthError> {
        let nonce = request.oauth_param("oauth_nonce").unwrap_or_default();
        self.replay.check_and_record(NonceKey {
            consumer_key: consumer.key.clone(),
            token_key: token_key.map(str::to_owned),
            nonce: nonce.to_owned(),
        })?;
        self.replay
            .check_timestamp(request.oauth_param("oauth_timestamp").unwrap_or_default())?;
        let method = SignatureMethod::resolve(
            request
                .oauth_param("oauth_signature_method")
                .unwrap_or_default(),
        )?;
        let signature = request.oauth_param("oauth_signature").unwrap_or_default();
        let base = signing_base_string(request.method(), request.url(), &request.signing_params());
        if !method.verify(&base, signature, &consumer.secret, token_secret) {
            return Err(AuthError::InvalidSignature {
                expected_base: base,
            });
        }
        Ok(())
    }
}

/// Resolve the callback for a new request token.
///
/// `oauth_callback` is mandatory under OAuth 1.0a; the consumer's registered
/// callback stands in for clients that omit it. A literal `oob` value asks
/// for out-of-band delivery: the registered callback (if any) still wins as
/// the redirect target, otherwise the token carries no callback and the
/// authorize step presents the verifier directly.
fn resolve_callback(
    param: Option<&str>,
    registered: Option<&str>,
) -> Result<Option<String>, AuthError> {
    match param {
        Some("oob") => Ok(registered.map(str::to_owned)),
        Some(callback) => Ok(Some(callback.to_owned())),
        None => match registered {
            Some(callback) => Ok(Some(callback.to_owned())),
            None => Err(AuthError::MissingCallback),
        },
    }
}
