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

//! The cached session record.
//!
//! A [`SessionRecord`] is what the identity provider hands back after a
//! successful login: the raw ID token plus the identity claims decoded from
//! it. It is stored as a single JSON string in the durable store.
//!
//! # Example
//!
//! ```json
//! {
//!   "id_token": "eyJraWQiOi...",
//!   "profile": {
//!     "sub": "6f1c...",
//!     "email": "alice@example.com",
//!     "cognito:username": "alice",
//!     "email_verified": true
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity claims returned by the provider.
///
/// The claims used by the application have their own fields. Everything else
/// the provider sends lands in `claims` and is written back unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Profile {
    /// Subject identifier (stable per user and provider).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// User pool username issued by Amazon Cognito.
    #[serde(
        rename = "cognito:username",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cognito_username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Provider-specific claims not modelled above.
    #[serde(flatten)]
    pub claims: BTreeMap<String, Value>,
}

impl Profile {
    /// Profile with only an email claim.
    pub fn with_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Self::default()
        }
    }

    /// Name to show for the signed-in user: `email`, else the Cognito
    /// username, else `preferred_username`. Empty claims are skipped.
    pub fn display_name(&self) -> Option<&str> {
        [
            self.email.as_deref(),
            self.cognito_username.as_deref(),
            self.preferred_username.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    }

    /// Look up any claim by its JSON name, including the modelled ones.
    pub fn claim(&self, name: &str) -> Option<Value> {
        let modelled = match name {
            "sub" => self.sub.as_ref(),
            "email" => self.email.as_ref(),
            "cognito:username" => self.cognito_username.as_ref(),
            "preferred_username" => self.preferred_username.as_ref(),
            "name" => self.name.as_ref(),
            _ => return self.claims.get(name).cloned(),
        };
        modelled.map(|s| Value::String(s.clone()))
    }

    /// Remove an unmodelled claim (e.g. protocol-only claims like `nonce`).
    pub fn take_claim(&mut self, name: &str) -> Option<Value> {
        self.claims.remove(name)
    }
}

/// Cached identity and token data for the current user.
///
/// `id_token` is the only required field; it is sent verbatim as the
/// `Authorization` header value on API calls. The remaining token fields are
/// kept so that a record can be written back without losing data, but the
/// cache never interprets them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionRecord {
    pub id_token: String,

    #[serde(default)]
    pub profile: Profile,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Access token expiry (Unix seconds), informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl SessionRecord {
    pub fn new(id_token: &str, profile: Profile) -> Self {
        Self {
            id_token: id_token.to_string(),
            profile,
            access_token: None,
            refresh_token: None,
            token_type: None,
            scope: None,
            expires_at: None,
        }
    }
}
