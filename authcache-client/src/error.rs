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

//! Error types for the login flow, the REST client and configuration.
//!
//! The session cache itself has no error type: an absent or unreadable
//! record is reported as `None`.

use authcache_types::OAuthErrorResponse;
use thiserror::Error;

/// Errors returned by [`LoginFlow`](crate::login::LoginFlow).
#[derive(Debug, Error)]
pub enum LoginError {
    /// The provider redirected back with `error=...` instead of a code.
    #[error("Identity provider returned an error: {0}")]
    Provider(OAuthErrorResponse),

    /// No pending login matches the callback `state` (never issued, or
    /// already completed).
    #[error("Unknown or already used login state")]
    UnknownState,

    /// The pending login was started too long ago.
    #[error("Login state expired. Please sign in again.")]
    ExpiredState,

    /// The token endpoint rejected the code exchange with an OAuth error body.
    #[error("Token request rejected: {0}")]
    Rejected(OAuthErrorResponse),

    /// The token endpoint failed with a non-OAuth error body.
    #[error("Token endpoint error ({status}): {body}")]
    TokenEndpoint { status: u16, body: String },

    /// The token response carried no `id_token` (is `openid` in the scope?).
    #[error("Token response is missing id_token")]
    MissingIdToken,

    /// The `id_token` is not a decodable JWT.
    #[error("Malformed id_token: {0}")]
    MalformedIdToken(String),

    /// The `nonce` claim does not match the one sent with the login.
    #[error("id_token nonce mismatch")]
    NonceMismatch,

    /// The `aud` claim does not include the configured client id.
    #[error("id_token audience does not include client id")]
    AudienceMismatch,

    /// The discovery document could not be fetched or parsed.
    #[error("OIDC discovery failed: {0}")]
    Discovery(String),

    /// Invalid configuration (e.g. an endpoint that is not a URL).
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A network or transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Errors returned by [`ApiClient`](crate::api::ApiClient) methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API rejected the token (HTTP 401).
    #[error("Not authenticated. Please log in.")]
    NotAuthenticated,

    /// The server denied access (HTTP 403).
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// The requested resource was not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A server error with status code and body.
    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    /// A network or transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Errors raised while loading [`ClientConfig`](crate::config::ClientConfig).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}
