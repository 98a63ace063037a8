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

//! Response bodies returned by the identity provider.

use serde::{Deserialize, Serialize};

/// Successful response from the token endpoint (RFC 6749 section 5.1).
///
/// OIDC providers add `id_token`. Every field is optional here so that the
/// login flow can report a missing `id_token` precisely instead of failing
/// with a generic parse error.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Subset of `.well-known/openid-configuration` used by the login flow.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    #[serde(default)]
    pub issuer: Option<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default)]
    pub userinfo_endpoint: Option<String>,
    #[serde(default)]
    pub end_session_endpoint: Option<String>,
    #[serde(default)]
    pub jwks_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cognito_discovery_document() {
        let body = r#"{
            "authorization_endpoint": "https://auth.example.com/oauth2/authorize",
            "issuer": "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_abc",
            "jwks_uri": "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_abc/.well-known/jwks.json",
            "response_types_supported": ["code", "token"],
            "token_endpoint": "https://auth.example.com/oauth2/token",
            "userinfo_endpoint": "https://auth.example.com/oauth2/userInfo"
        }"#;
        let meta: ProviderMetadata = serde_json::from_str(body).unwrap();
        assert_eq!(meta.token_endpoint, "https://auth.example.com/oauth2/token");
        assert!(meta.end_session_endpoint.is_none());
    }

    #[test]
    fn token_response_tolerates_missing_fields() {
        let resp: TokenResponse = serde_json::from_str(r#"{"access_token":"at"}"#).unwrap();
        assert_eq!(resp.access_token.as_deref(), Some("at"));
        assert!(resp.id_token.is_none());
    }
}
