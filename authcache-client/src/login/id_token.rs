/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Unverified ID token decoding.
//!
//! The token has just been received from the provider's token endpoint over
//! TLS; the signature is checked by whoever consumes it as a bearer token.

use authcache_types::Profile;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::LoginError;

/// Decode the payload segment of a JWT into a [`Profile`].
///
/// All claims are kept, including protocol claims such as `aud` and `nonce`.
pub fn decode_id_token_profile(id_token: &str) -> Result<Profile, LoginError> {
    let mut parts = id_token.split('.');
    let claims_b64 = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(claims), Some(_), None) => claims,
        _ => return Err(LoginError::MalformedIdToken("expected three segments".to_string())),
    };

    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_b64.trim_end_matches('='))
        .map_err(|e| LoginError::MalformedIdToken(format!("base64: {e}")))?;

    serde_json::from_slice(&claims_bytes)
        .map_err(|e| LoginError::MalformedIdToken(format!("claims: {e}")))
}

#[cfg(test)]
pub(crate) fn encode_test_id_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","kid":"test"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_claims() {
        let token = encode_test_id_token(&json!({
            "sub": "123",
            "email": "a@b.com",
            "cognito:username": "alice",
            "aud": "client-1"
        }));
        let profile = decode_id_token_profile(&token).unwrap();
        assert_eq!(profile.email.as_deref(), Some("a@b.com"));
        assert_eq!(profile.cognito_username.as_deref(), Some("alice"));
        assert_eq!(profile.claims.get("aud"), Some(&json!("client-1")));
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!(matches!(
            decode_id_token_profile("abc.def"),
            Err(LoginError::MalformedIdToken(_))
        ));
    }

    #[test]
    fn rejects_non_json_payload() {
        let token = format!("e30.{}.sig", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(
            decode_id_token_profile(&token),
            Err(LoginError::MalformedIdToken(_))
        ));
    }
}
