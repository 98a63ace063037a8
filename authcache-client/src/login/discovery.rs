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

//! OIDC discovery: fetching `.well-known/openid-configuration`.

use authcache_types::ProviderMetadata;

use crate::error::LoginError;

/// Fetch the discovery document from `{authority}/.well-known/openid-configuration`.
pub async fn discover_provider(
    http: &reqwest::Client,
    authority: &str,
) -> Result<ProviderMetadata, LoginError> {
    let url = format!(
        "{}/.well-known/openid-configuration",
        authority.trim_end_matches('/')
    );
    log::debug!("Fetching OIDC discovery document from {url}");

    let resp = http
        .get(&url)
        .send()
        .await
        .map_err(|e| LoginError::Discovery(format!("request failed: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(LoginError::Discovery(format!("HTTP {status}: {body}")));
    }

    resp.json::<ProviderMetadata>()
        .await
        .map_err(|e| LoginError::Discovery(format!("invalid discovery document: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_and_parses_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pool/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "issuer": format!("{}/pool", server.uri()),
                "authorization_endpoint": format!("{}/oauth2/authorize", server.uri()),
                "token_endpoint": format!("{}/oauth2/token", server.uri()),
            })))
            .mount(&server)
            .await;

        let meta = discover_provider(&reqwest::Client::new(), &format!("{}/pool/", server.uri()))
            .await
            .unwrap();
        assert_eq!(meta.token_endpoint, format!("{}/oauth2/token", server.uri()));
    }

    #[tokio::test]
    async fn http_failure_is_a_discovery_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let err = discover_provider(&reqwest::Client::new(), &server.uri())
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Discovery(msg) if msg.contains("404")));
    }
}
