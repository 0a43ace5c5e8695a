//! Normalized request descriptor and OAuth parameter extraction.
//!
//! The transport layer reduces an inbound HTTP request to a
//! [`SignedRequest`]: method, base URL, and the request parameters from the
//! query string and form body, plus the parsed `Authorization: OAuth ...`
//! header when present. Everything the verification pipeline needs comes
//! from this descriptor; the core never touches the transport.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::error::AuthError;

/// Parameters every signed request must carry.
pub const REQUIRED_OAUTH_PARAMS: [&str; 5] = [
    "oauth_consumer_key",
    "oauth_signature_method",
    "oauth_signature",
    "oauth_timestamp",
    "oauth_nonce",
];

/// A transport-neutral view of one signed request.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    method: String,
    url: String,
    params: Vec<(String, String)>,
    header_params: Vec<(String, String)>,
}

impl SignedRequest {
    /// Create a descriptor from the request line and its query/body
    /// parameters. `url` is scheme+host+path with no query string.
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        params: Vec<(String, String)>,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            params,
            header_params: Vec::new(),
        }
    }

    /// Attach parameters from an `Authorization` header value.
    ///
    /// Non-OAuth authorization schemes contribute nothing. The advisory
    /// `realm` field and malformed pairs are dropped.
    #[must_use]
    pub fn with_authorization(mut self, header: &str) -> Self {
        self.header_params = parse_authorization_header(header);
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Base URL (scheme+host+path).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Merged view of the `oauth_*` parameters. Header values take
    /// precedence over query/body values on conflict.
    pub fn oauth_params(&self) -> HashMap<&str, &str> {
        let mut merged = HashMap::new();
        for (k, v) in &self.params {
            if k.starts_with("oauth_") {
                merged.insert(k.as_str(), v.as_str());
            }
        }
        for (k, v) in &self.header_params {
            merged.insert(k.as_str(), v.as_str());
        }
        merged
    }

    /// Look up one `oauth_*` parameter, header precedence.
    pub fn oauth_param(&self, name: &str) -> Option<&str> {
        self.header_params
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .or_else(|| self.params.iter().find(|(k, _)| k.as_str() == name))
            .map(|(_, v)| v.as_str())
    }

    /// Parameters that participate in signing: every query/body parameter
    /// plus the header `oauth_*` parameters, minus `oauth_signature`.
    /// Duplicates are kept; normalization sorts them later.
    pub fn signing_params(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .params
            .iter()
            .filter(|(k, _)| k.as_str() != "oauth_signature")
            .cloned()
            .collect();
        out.extend(
            self.header_params
                .iter()
                .filter(|(k, _)| k.as_str() != "oauth_signature")
                .cloned(),
        );
        out
    }

    /// Whether anything OAuth-shaped is present at all.
    pub fn has_oauth_params(&self) -> bool {
        !self.header_params.is_empty() || self.params.iter().any(|(k, _)| k.starts_with("oauth_"))
    }

    /// Presence gate for a verifying transition.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotAnOAuthRequest`] when no OAuth parameters are present
    /// at all; [`AuthError::PartialOAuthRequest`] when the required set is
    /// incomplete.
    pub fn require(&self, required: &[&'static str]) -> Result<(), AuthError> {
        if !self.has_oauth_params() {
            return Err(AuthError::NotAnOAuthRequest);
        }
        let present = self.oauth_params();
        let missing: Vec<&'static str> = required
            .iter()
            .copied()
            .filter(|name| !present.contains_key(name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::PartialOAuthRequest { missing })
        }
    }
}

/// Parse an `OAuth k1="v1", k2="v2"` header value into decoded pairs.
/// Only `oauth_`-prefixed keys are kept; `realm` is advisory and never
/// participates in signing or validation.
fn parse_authorization_header(header: &str) -> Vec<(String, String)> {
    let Some(rest) = header.strip_prefix("OAuth ") else {
        return Vec::new();
    };
    rest.split(',')
        .filter_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            let key = key.trim();
            if !key.starts_with("oauth_") {
                return None;
            }
            let value = value.trim().trim_matches('"');
            Some((
                key.to_owned(),
                percent_decode_str(value).decode_utf8_lossy().into_owned(),
            ))
        })
        .collect()
}
