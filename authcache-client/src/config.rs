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

//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use authcache_types::ProviderMetadata;

use crate::error::ConfigError;

pub const DEFAULT_SCOPE: &str = "email openid";
pub const DEFAULT_RESPONSE_TYPE: &str = "code";

/// OIDC client registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidcConfig {
    /// Issuer URL; discovery is fetched from `{authority}/.well-known/openid-configuration`.
    pub authority: String,
    pub client_id: String,
    /// Only set for confidential clients.
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    /// Where the provider sends the user after logout.
    pub logout_uri: String,
    /// Hosted UI domain serving `/logout` (Cognito), e.g.
    /// `https://example-auth.auth.us-west-2.amazoncognito.com`.
    pub logout_domain: Option<String>,
    pub scope: String,
    pub response_type: String,
    /// Skip discovery and use these endpoints.
    pub endpoints: Option<ProviderMetadata>,
}

impl OidcConfig {
    /// Config with default scope and response type. `logout_uri` defaults to
    /// the redirect URI.
    pub fn new(authority: &str, client_id: &str, redirect_uri: &str) -> Self {
        Self {
            authority: authority.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: None,
            redirect_uri: redirect_uri.to_string(),
            logout_uri: redirect_uri.to_string(),
            logout_domain: None,
            scope: DEFAULT_SCOPE.to_string(),
            response_type: DEFAULT_RESPONSE_TYPE.to_string(),
            endpoints: None,
        }
    }
}

/// Everything the CLI and apps need to build a [`Session`](crate::session::Session)
/// and an [`ApiClient`](crate::api::ApiClient).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST API base URL.
    pub api_endpoint: Option<String>,
    /// OIDC settings. `None` if `OIDC_CLIENT_ID` is unset or empty.
    pub oidc: Option<OidcConfig>,
    /// File store location; [`FileStore::default_path`](crate::store::FileStore::default_path) when unset.
    pub store_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Optional
    /// - `API_ENDPOINT`
    /// - `AUTHCACHE_STORE_PATH`
    /// - OIDC: `OIDC_CLIENT_ID`; when set, `OIDC_AUTHORITY` and
    ///   `OIDC_REDIRECT_URI` are required, and `OIDC_LOGOUT_URI`,
    ///   `OIDC_LOGOUT_DOMAIN`, `OIDC_SCOPE`, `OIDC_CLIENT_SECRET` are read.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_endpoint = non_empty("API_ENDPOINT");
        let store_path = non_empty("AUTHCACHE_STORE_PATH").map(PathBuf::from);

        let oidc = non_empty("OIDC_CLIENT_ID")
            .map(|client_id| {
                let authority =
                    non_empty("OIDC_AUTHORITY").ok_or(ConfigError::Missing("OIDC_AUTHORITY"))?;
                let redirect_uri = non_empty("OIDC_REDIRECT_URI")
                    .ok_or(ConfigError::Missing("OIDC_REDIRECT_URI"))?;
                validate_url("OIDC_AUTHORITY", &authority)?;
                validate_url("OIDC_REDIRECT_URI", &redirect_uri)?;

                let mut oidc = OidcConfig::new(&authority, &client_id, &redirect_uri);
                if let Some(logout_uri) = non_empty("OIDC_LOGOUT_URI") {
                    oidc.logout_uri = logout_uri;
                }
                if let Some(domain) = non_empty("OIDC_LOGOUT_DOMAIN") {
                    validate_url("OIDC_LOGOUT_DOMAIN", &domain)?;
                    oidc.logout_domain = Some(domain.trim_end_matches('/').to_string());
                }
                if let Some(scope) = non_empty("OIDC_SCOPE") {
                    oidc.scope = scope;
                }
                oidc.client_secret = non_empty("OIDC_CLIENT_SECRET");
                Ok::<_, ConfigError>(oidc)
            })
            .transpose()?;

        Ok(Self {
            api_endpoint,
            oidc,
            store_path,
        })
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "API_ENDPOINT",
        "AUTHCACHE_STORE_PATH",
        "OIDC_CLIENT_ID",
        "OIDC_AUTHORITY",
        "OIDC_REDIRECT_URI",
        "OIDC_LOGOUT_URI",
        "OIDC_LOGOUT_DOMAIN",
        "OIDC_SCOPE",
        "OIDC_CLIENT_SECRET",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn empty_environment_yields_empty_config() {
        clear_env();
        assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());
    }

    #[test]
    #[serial]
    fn oidc_settings_with_defaults() {
        clear_env();
        env::set_var("OIDC_CLIENT_ID", "client-1");
        env::set_var(
            "OIDC_AUTHORITY",
            "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_abc/",
        );
        env::set_var("OIDC_REDIRECT_URI", "http://localhost:5173");
        env::set_var("API_ENDPOINT", "https://api.example.com");

        let config = ClientConfig::from_env().unwrap();
        let oidc = config.oidc.unwrap();
        assert_eq!(
            oidc.authority,
            "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_abc"
        );
        assert_eq!(oidc.scope, DEFAULT_SCOPE);
        assert_eq!(oidc.logout_uri, "http://localhost:5173");
        assert_eq!(oidc.logout_domain, None);
        assert_eq!(config.api_endpoint.as_deref(), Some("https://api.example.com"));
        clear_env();
    }

    #[test]
    #[serial]
    fn client_id_without_authority_is_an_error() {
        clear_env();
        env::set_var("OIDC_CLIENT_ID", "client-1");
        env::set_var("OIDC_REDIRECT_URI", "http://localhost:5173");
        assert_eq!(
            ClientConfig::from_env(),
            Err(ConfigError::Missing("OIDC_AUTHORITY"))
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn invalid_logout_domain_is_an_error() {
        clear_env();
        env::set_var("OIDC_CLIENT_ID", "client-1");
        env::set_var("OIDC_AUTHORITY", "https://idp.example.com");
        env::set_var("OIDC_REDIRECT_URI", "http://localhost:5173");
        env::set_var("OIDC_LOGOUT_DOMAIN", "not a url");
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::Invalid {
                name: "OIDC_LOGOUT_DOMAIN",
                ..
            })
        ));
        clear_env();
    }
}
