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

//! OAuth 2.0 error payloads.
//!
//! The same shape is used by the token endpoint (JSON body of a 4xx response)
//! and by the authorization endpoint (query parameters on the redirect back).

use serde::{Deserialize, Serialize};

/// Error returned by the identity provider.
///
/// The `error` field is a machine-readable code such as `"access_denied"` or
/// `"invalid_grant"`. The optional description is meant for developers and is
/// not always safe to show to end users.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OAuthErrorResponse {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

impl OAuthErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            error_description: None,
            error_uri: None,
        }
    }

    pub fn with_description(error: &str, description: &str) -> Self {
        Self {
            error: error.to_string(),
            error_description: Some(description.to_string()),
            error_uri: None,
        }
    }
}

impl std::fmt::Display for OAuthErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "[{}] {}", self.error, description),
            None => write!(f, "[{}]", self.error),
        }
    }
}

impl std::error::Error for OAuthErrorResponse {}
