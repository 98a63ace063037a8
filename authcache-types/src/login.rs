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

//! Values exchanged between the two login steps.
//!
//! `begin_login` produces a [`RedirectTarget`]; the provider later sends the
//! user back to the redirect URI with either an authorization code or an
//! error, which is parsed into a [`CallbackPayload`] for `complete_login`.

use thiserror::Error;
use url::Url;

use crate::error::OAuthErrorResponse;

/// Where to send the user to start a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    /// Fully encoded authorization URL.
    pub url: Url,
    /// CSRF state embedded in `url`; the provider echoes it back.
    pub state: String,
}

/// Parameters the provider attaches to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPayload {
    /// The user authenticated; `code` is exchanged at the token endpoint.
    Code { code: String, state: String },
    /// The provider refused or the user cancelled.
    Error {
        error: OAuthErrorResponse,
        state: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CallbackParseError {
    #[error("Invalid callback URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Callback is missing the `{0}` parameter")]
    MissingParameter(&'static str),
}

impl CallbackPayload {
    /// Parse the full redirect URL, e.g.
    /// `http://localhost:5173/?code=abc&state=xyz`.
    pub fn from_url(url: &str) -> Result<Self, CallbackParseError> {
        let url = Url::parse(url)?;
        Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
    }

    /// Parse only the query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Result<Self, CallbackParseError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    /// State echoed by the provider, when present.
    pub fn state(&self) -> Option<&str> {
        match self {
            CallbackPayload::Code { state, .. } => Some(state),
            CallbackPayload::Error { state, .. } => state.as_deref(),
        }
    }

    fn from_pairs(pairs: impl Iterator<Item = (String, String)>) -> Result<Self, CallbackParseError> {
        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut error_description = None;
        let mut error_uri = None;

        for (key, value) in pairs {
            match key.as_str() {
                "code" => code = Some(value),
                "state" => state = Some(value),
                "error" => error = Some(value),
                "error_description" => error_description = Some(value),
                "error_uri" => error_uri = Some(value),
                _ => {}
            }
        }

        // An error takes precedence over a code.
        if let Some(error) = error {
            return Ok(CallbackPayload::Error {
                error: OAuthErrorResponse {
                    error,
                    error_description,
                    error_uri,
                },
                state,
            });
        }

        let code = code.ok_or(CallbackParseError::MissingParameter("code"))?;
        let state = state.ok_or(CallbackParseError::MissingParameter("state"))?;
        Ok(CallbackPayload::Code { code, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_code_from_url() {
        let payload =
            CallbackPayload::from_url("http://localhost:5173/?code=abc&state=xyz").unwrap();
        assert_eq!(
            payload,
            CallbackPayload::Code {
                code: "abc".to_string(),
                state: "xyz".to_string()
            }
        );
        assert_eq!(payload.state(), Some("xyz"));
    }

    #[test]
    fn parses_provider_error() {
        let payload = CallbackPayload::from_query(
            "?error=access_denied&error_description=User+cancelled&state=xyz",
        )
        .unwrap();
        match payload {
            CallbackPayload::Error { error, state } => {
                assert_eq!(error.error, "access_denied");
                assert_eq!(error.error_description.as_deref(), Some("User cancelled"));
                assert_eq!(state.as_deref(), Some("xyz"));
            }
            other => panic!("expected error payload, got {other:?}"),
        }
    }

    #[test]
    fn missing_state_is_rejected() {
        let err = CallbackPayload::from_query("code=abc").unwrap_err();
        assert!(matches!(err, CallbackParseError::MissingParameter("state")));
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            CallbackPayload::from_url("not a url"),
            Err(CallbackParseError::InvalidUrl(_))
        ));
    }
}
