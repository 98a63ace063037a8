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

//! REST client that authenticates every request from the session cache.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

use crate::cache::SessionCache;
use crate::error::ApiError;

/// How the cached token is placed in the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthScheme {
    /// The token verbatim. This is what API Gateway Cognito authorizers
    /// expect.
    #[default]
    Raw,
    /// `Bearer <token>`.
    Bearer,
}

/// A REST client for the application API.
///
/// The token is read from the cache on every request, so signing in or out
/// takes effect without rebuilding the client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    cache: SessionCache,
    scheme: AuthScheme,
    http: Client,
}

impl ApiClient {
    /// # Arguments
    ///
    /// * `base_url` - e.g. `"https://abc123.execute-api.us-west-2.amazonaws.com"`
    /// * `cache` - where the bearer token is read from
    pub fn new(base_url: &str, cache: SessionCache) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            scheme: AuthScheme::default(),
            http: Client::new(),
        }
    }

    pub fn with_scheme(mut self, scheme: AuthScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Calls `GET /api/ping` and returns the JSON body as-is.
    pub async fn ping(&self) -> Result<serde_json::Value, ApiError> {
        let response = self.get("/api/ping").send().await?;
        log::debug!("Ping response status: {}", response.status());
        parse_json_response(response).await
    }

    /// Build a GET request with headers applied.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.apply_headers(self.http.get(self.url(path)))
    }

    /// Build a POST request with headers applied.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.apply_headers(self.http.post(self.url(path)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*");

        let token = self.cache.bearer_token();
        if token.is_empty() {
            return builder;
        }
        match self.scheme {
            AuthScheme::Raw => builder.header(AUTHORIZATION, token),
            AuthScheme::Bearer => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        }
    }
}

/// Map the status code to [`ApiError`], parsing the body as JSON on success.
pub(crate) async fn parse_json_response(
    response: reqwest::Response,
) -> Result<serde_json::Value, ApiError> {
    let status = response.status().as_u16();
    match status {
        200..=299 => Ok(response.json().await?),
        401 => Err(ApiError::NotAuthenticated),
        403 => {
            let text = response.text().await.unwrap_or_default();
            Err(ApiError::Forbidden(text))
        }
        404 => {
            let text = response.text().await.unwrap_or_default();
            Err(ApiError::NotFound(text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ApiError::ServerError { status, body: text })
        }
    }
}
