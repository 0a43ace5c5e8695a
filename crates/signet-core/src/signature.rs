//! OAuth 1.0 signature construction and verification (RFC 5849).
//!
//! Supports the two methods the provider accepts: HMAC-SHA1 and PLAINTEXT.
//! Both share the same request normalization; only the final signing step
//! differs.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode per RFC 3986. Space becomes `%20`, never `+`.
pub fn oauth_encode(input: &str) -> String {
    percent_encode(input.as_bytes(), OAUTH_ENCODE_SET).to_string()
}

/// Signature method selected by the `oauth_signature_method` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    /// `HMAC-SHA1`: base64 of the MAC over the base string.
    HmacSha1,
    /// `PLAINTEXT`: the signing key itself. Acceptable only over a transport
    /// providing confidentiality; that is a deployment concern, not this
    /// engine's.
    Plaintext,
}

impl SignatureMethod {
    /// Resolve a wire name.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownSignatureMethod`] for anything other than
    /// `HMAC-SHA1` or `PLAINTEXT`.
    pub fn resolve(name: &str) -> Result<Self, AuthError> {
        match name {
            "HMAC-SHA1" => Ok(Self::HmacSha1),
            "PLAINTEXT" => Ok(Self::Plaintext),
            _ => Err(AuthError::UnknownSignatureMethod {
                method: name.to_owned(),
            }),
        }
    }

    /// Wire name of the method.
    pub fn name(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::Plaintext => "PLAINTEXT",
        }
    }

    /// Produce a signature over the base string.
    pub fn sign(
        self,
        base_string: &str,
        consumer_secret: &str,
        token_secret: Option<&str>,
    ) -> String {
        let key = signing_key(consumer_secret, token_secret);
        match self {
            Self::HmacSha1 => {
                let mut mac = HmacSha1::new_from_slice(key.as_bytes())
                    .expect("HMAC accepts keys of any length");
                mac.update(base_string.as_bytes());
                BASE64_STANDARD.encode(mac.finalize().into_bytes())
            }
            Self::Plaintext => key,
        }
    }

    /// Check a presented signature. The comparison is constant-time and
    /// bit-for-bit; no partial matches.
    pub fn verify(
        self,
        base_string: &str,
        signature: &str,
        consumer_secret: &str,
        token_secret: Option<&str>,
    ) -> bool {
        match self {
            Self::HmacSha1 => {
                let Ok(presented) = BASE64_STANDARD.decode(signature) else {
                    return false;
                };
                let key = signing_key(consumer_secret, token_secret);
                let mut mac = HmacSha1::new_from_slice(key.as_bytes())
                    .expect("HMAC accepts keys of any length");
                mac.update(base_string.as_bytes());
                mac.verify_slice(&presented).is_ok()
            }
            Self::Plaintext => {
                let expected = signing_key(consumer_secret, token_secret);
                expected.as_bytes().ct_eq(signature.as_bytes()).into()
            }
        }
    }
}

/// Normalized parameter string: encode each key and value, sort the encoded
/// pairs by key then value, join as `k=v` with `&`. Duplicate-valued keys are
/// each included; `oauth_signature` never participates.
pub fn normalized_parameters(params: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| k.as_str() != "oauth_signature")
        .map(|(k, v)| (oauth_encode(k), oauth_encode(v)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signature base string per RFC 5849 Section 3.4.1.
///
/// Format: `HTTP_METHOD&encoded_base_url&encoded_parameters`, where the base
/// URL is scheme+host+path with no query string.
pub fn signing_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        oauth_encode(url),
        oauth_encode(&normalized_parameters(params))
    )
}

/// Signing key shared by both methods:
/// `enc(consumer_secret)&enc(token_secret or "")`.
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        oauth_encode(consumer_secret),
        oauth_encode(token_secret.unwrap_or(""))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_oauth_encode_unreserved() {
        assert_eq!(oauth_encode("abc123"), "abc123");
        assert_eq!(oauth_encode("ABC"), "ABC");
        assert_eq!(oauth_encode("-._~"), "-._~");
    }

    #[test]
    fn test_oauth_encode_reserved() {
        assert_eq!(oauth_encode(" "), "%20");
        assert_eq!(oauth_encode("&"), "%26");
        assert_eq!(oauth_encode("="), "%3D");
        assert_eq!(oauth_encode("/"), "%2F");
    }

    #[test]
    fn test_normalized_parameters_sorted_and_joined() {
        let normalized = normalized_parameters(&params(&[("b", "2"), ("a", "1")]));

        assert_eq!(normalized, "a=1&b=2");
    }

    #[test]
    fn test_normalized_parameters_sorts_duplicate_keys_by_value() {
        let normalized = normalized_parameters(&params(&[("a", "2"), ("a", "1")]));

        assert_eq!(normalized, "a=1&a=2");
    }

    #[test]
    fn test_normalized_parameters_excludes_signature() {
        let normalized =
            normalized_parameters(&params(&[("oauth_signature", "xxx"), ("a", "1")]));

        assert_eq!(normalized, "a=1");
    }

    #[test]
    fn test_normalized_parameters_encodes_spaces_as_percent20() {
        let normalized = normalized_parameters(&params(&[("q", "two words")]));

        assert_eq!(normalized, "q=two%20words");
    }

    #[test]
    fn test_base_string_structure() {
        let base = signing_base_string(
            "get",
            "http://example.com/api",
            &params(&[("a", "1")]),
        );

        assert_eq!(base, "GET&http%3A%2F%2Fexample.com%2Fapi&a%3D1");
    }

    // Known-answer vector from the OAuth Core 1.0 specification (Appendix A).
    #[test]
    fn test_hmac_sha1_specification_vector() {
        let request = params(&[
            ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
            ("oauth_token", "nnch734d00sl2jdk"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1191242096"),
            ("oauth_nonce", "kllo9940pd9333jh"),
            ("oauth_version", "1.0"),
            ("file", "vacation.jpg"),
            ("size", "original"),
        ]);
        let base = signing_base_string("GET", "http://photos.example.net/photos", &request);

        assert_eq!(
            base,
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26\
             oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26\
             oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
        );

        let signature =
            SignatureMethod::HmacSha1.sign(&base, "kd94hf93k423kf44", Some("pfkkdhi9sl3r4s00"));
        assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn test_hmac_sha1_round_trip() {
        let request = params(&[("a", "1"), ("oauth_nonce", "n1")]);
        let base = signing_base_string("GET", "http://example.com/r", &request);
        let signature = SignatureMethod::HmacSha1.sign(&base, "cs", Some("ts"));

        assert!(SignatureMethod::HmacSha1.verify(&base, &signature, "cs", Some("ts")));
    }

    #[test]
    fn test_hmac_sha1_parameter_mutation_fails() {
        let request = params(&[("a", "1")]);
        let base = signing_base_string("GET", "http://example.com/r", &request);
        let signature = SignatureMethod::HmacSha1.sign(&base, "cs", None);

        let mutated = signing_base_string(
            "GET",
            "http://example.com/r",
            &params(&[("a", "2")]),
        );
        assert!(!SignatureMethod::HmacSha1.verify(&mutated, &signature, "cs", None));
    }

    #[test]
    fn test_hmac_sha1_method_mutation_fails() {
        let request = params(&[("a", "1")]);
        let base = signing_base_string("GET", "http://example.com/r", &request);
        let signature = SignatureMethod::HmacSha1.sign(&base, "cs", None);

        let mutated = signing_base_string("POST", "http://example.com/r", &request);
        assert!(!SignatureMethod::HmacSha1.verify(&mutated, &signature, "cs", None));
    }

    #[test]
    fn test_hmac_sha1_url_mutation_fails() {
        let request = params(&[("a", "1")]);
        let base = signing_base_string("GET", "http://example.com/r", &request);
        let signature = SignatureMethod::HmacSha1.sign(&base, "cs", None);

        let mutated = signing_base_string("GET", "http://example.com/x", &request);
        assert!(!SignatureMethod::HmacSha1.verify(&mutated, &signature, "cs", None));
    }

    #[test]
    fn test_hmac_sha1_signature_mutation_fails() {
        let request = params(&[("a", "1")]);
        let base = signing_base_string("GET", "http://example.com/r", &request);
        let mut signature = SignatureMethod::HmacSha1.sign(&base, "cs", None);
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        signature.replace_range(0..1, flipped);

        assert!(!SignatureMethod::HmacSha1.verify(&base, &signature, "cs", None));
    }

    #[test]
    fn test_hmac_sha1_rejects_invalid_base64() {
        assert!(!SignatureMethod::HmacSha1.verify("base", "not base64!!!", "cs", None));
    }

    #[test]
    fn test_plaintext_sign_and_verify() {
        let signature = SignatureMethod::Plaintext.sign("ignored", "c s", Some("t&s"));

        assert_eq!(signature, "c%20s&t%26s");
        assert!(SignatureMethod::Plaintext.verify("ignored", "c%20s&t%26s", "c s", Some("t&s")));
        assert!(!SignatureMethod::Plaintext.verify("ignored", "c%20s&", "c s", Some("t&s")));
    }

    #[test]
    fn test_plaintext_without_token_secret() {
        assert_eq!(SignatureMethod::Plaintext.sign("", "cs", None), "cs&");
    }

    #[test]
    fn test_resolve_known_methods() {
        assert_eq!(
            SignatureMethod::resolve("HMAC-SHA1").unwrap(),
            SignatureMethod::HmacSha1
        );
        assert_eq!(
            SignatureMethod::resolve("PLAINTEXT").unwrap(),
            SignatureMethod::Plaintext
        );
    }

    #[test]
    fn test_resolve_unknown_method() {
        let err = SignatureMethod::resolve("RSA-SHA1").unwrap_err();

        assert!(matches!(
            err,
            AuthError::UnknownSignatureMethod { method } if method == "RSA-SHA1"
        ));
    }

    #[test]
    fn test_signing_key_encodes_secrets() {
        assert_eq!(signing_key("c&s", Some("t s")), "c%26s&t%20s");
        assert_eq!(signing_key("cs", None), "cs&");
    }
}
