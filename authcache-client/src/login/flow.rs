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

//! Auth URL construction, pending-login bookkeeping and code → token exchange.
//!
//! Between the two steps the user leaves the app, so the PKCE verifier and
//! nonce are written to the durable store under `oidc.<state>`. The callback
//! looks them up by the `state` the provider echoes back and deletes them, so
//! each login can be completed at most once.

use std::sync::Arc;

use authcache_types::{
    CallbackPayload, OAuthErrorResponse, ProviderMetadata, RedirectTarget, SessionRecord,
    TokenResponse,
};
use oauth2::{CsrfToken, PkceCodeChallenge};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::OidcConfig;
use crate::error::LoginError;
use crate::store::SessionStore;

use super::discovery::discover_provider;
use super::id_token::decode_id_token_profile;

/// Pending logins older than this are refused.
pub const PENDING_LOGIN_TTL_SECS: i64 = 15 * 60;

/// Upper bound on concurrently pending logins; the oldest are dropped first.
pub const MAX_PENDING_LOGINS: usize = 8;

const PENDING_KEY_PREFIX: &str = "oidc.";

/// Protocol claims dropped from the profile before it is cached.
const PROTOCOL_CLAIMS: &[&str] = &[
    "nonce", "at_hash", "iat", "nbf", "exp", "aud", "iss", "c_hash", "azp", "auth_time",
    "origin_jti", "jti", "token_use", "event_id",
];

/// State saved by `begin_login` and consumed by `complete_login`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    pub state: String,
    pub code_verifier: String,
    pub nonce: String,
    pub redirect_uri: String,
    /// Unix seconds.
    pub created_at: i64,
}

fn pending_key(state: &str) -> String {
    format!("{PENDING_KEY_PREFIX}{state}")
}

/// Cognito hosted-UI logout URL, `{domain}/logout?client_id=..&logout_uri=..`.
///
/// Needs no provider metadata, so it works even when discovery does not.
pub fn logout_domain_url(config: &OidcConfig) -> Option<Url> {
    let domain = config.logout_domain.as_deref()?;
    let mut url = Url::parse(&format!("{}/logout", domain.trim_end_matches('/'))).ok()?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("logout_uri", &config.logout_uri);
    Some(url)
}

/// Drives the authorization-code flow against one provider.
pub struct LoginFlow {
    config: OidcConfig,
    endpoints: ProviderMetadata,
    store: Arc<dyn SessionStore>,
    http: reqwest::Client,
}

impl std::fmt::Debug for LoginFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginFlow")
            .field("client_id", &self.config.client_id)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl LoginFlow {
    pub fn new(config: OidcConfig, endpoints: ProviderMetadata, store: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            endpoints,
            store,
            http: reqwest::Client::new(),
        }
    }

    /// Build a flow, fetching the discovery document unless the config
    /// already carries explicit endpoints.
    pub async fn discover(
        config: OidcConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, LoginError> {
        let http = reqwest::Client::new();
        let endpoints = match &config.endpoints {
            Some(endpoints) => endpoints.clone(),
            None => discover_provider(&http, &config.authority).await?,
        };
        Ok(Self {
            config,
            endpoints,
            store,
            http,
        })
    }

    pub fn config(&self) -> &OidcConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &ProviderMetadata {
        &self.endpoints
    }

    /// Step one: record a pending login and return the authorization URL.
    ///
    /// Parameters are URL-encoded. The caller is responsible for sending the
    /// user there (browser navigation, printing it, ...). Abandoned pending
    /// logins are swept first, so at most [`MAX_PENDING_LOGINS`] remain.
    pub fn begin_login(&self) -> Result<RedirectTarget, LoginError> {
        self.sweep_pending(MAX_PENDING_LOGINS - 1);

        let mut url = Url::parse(&self.endpoints.authorization_endpoint).map_err(|e| {
            LoginError::Config(format!("authorization_endpoint is not a URL: {e}"))
        })?;

        let csrf_state = CsrfToken::new_random();
        let nonce = CsrfToken::new_random();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let pending = PendingLogin {
            state: csrf_state.secret().clone(),
            code_verifier: pkce_verifier.secret().clone(),
            nonce: nonce.secret().clone(),
            redirect_uri: self.config.redirect_uri.clone(),
            created_at: chrono::Utc::now().timestamp(),
        };
        self.store
            .set(&pending_key(&pending.state), &serde_json::to_string(&pending)?);

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", &self.config.response_type)
            .append_pair("scope", &self.config.scope)
            .append_pair("code_challenge", pkce_challenge.as_str())
            .append_pair("code_challenge_method", "S256")
            .append_pair("state", &pending.state)
            .append_pair("nonce", &pending.nonce);

        log::debug!("Starting login, redirecting to {}", self.endpoints.authorization_endpoint);

        Ok(RedirectTarget {
            url,
            state: pending.state,
        })
    }

    /// Step two: exchange the returned code for tokens and build the record.
    ///
    /// The caller decides whether to cache the record; this method only
    /// touches the store to consume the pending login.
    pub async fn complete_login(
        &self,
        payload: CallbackPayload,
    ) -> Result<SessionRecord, LoginError> {
        let (code, state) = match payload {
            CallbackPayload::Code { code, state } => (code, state),
            CallbackPayload::Error { error, state } => {
                if let Some(state) = state {
                    self.store.delete(&pending_key(&state));
                }
                return Err(LoginError::Provider(error));
            }
        };

        let pending = self.take_pending(&state)?;
        let tokens = self.exchange_code(&code, &pending).await?;
        let id_token = tokens.id_token.ok_or(LoginError::MissingIdToken)?;

        let mut profile = decode_id_token_profile(&id_token)?;
        match profile.claim("nonce") {
            Some(Value::String(n)) if n == pending.nonce => {}
            _ => return Err(LoginError::NonceMismatch),
        }
        if !audience_includes(profile.claim("aud"), &self.config.client_id) {
            return Err(LoginError::AudienceMismatch);
        }
        for claim in PROTOCOL_CLAIMS {
            profile.take_claim(claim);
        }

        let now = chrono::Utc::now().timestamp();
        Ok(SessionRecord {
            id_token,
            profile,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            scope: tokens.scope,
            expires_at: tokens.expires_in.map(|secs| now + secs),
        })
    }

    /// Provider logout URL.
    ///
    /// With a configured logout domain this is the Cognito hosted-UI form
    /// `{domain}/logout?client_id=..&logout_uri=..`; otherwise the discovered
    /// `end_session_endpoint` with `post_logout_redirect_uri`.
    pub fn logout_url(&self) -> Option<Url> {
        if self.config.logout_domain.is_some() {
            return logout_domain_url(&self.config);
        }

        let mut url = Url::parse(self.endpoints.end_session_endpoint.as_deref()?).ok()?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("post_logout_redirect_uri", &self.config.logout_uri);
        Some(url)
    }

    /// Delete pending logins that are expired or unreadable, and all but the
    /// newest [`MAX_PENDING_LOGINS`]. Returns how many were removed.
    pub fn clear_stale_state(&self) -> usize {
        self.sweep_pending(MAX_PENDING_LOGINS)
    }

    fn sweep_pending(&self, keep: usize) -> usize {
        let now = chrono::Utc::now().timestamp();
        let mut stale = Vec::new();
        let mut live = Vec::new();
        for key in self.store.keys() {
            if !key.starts_with(PENDING_KEY_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key) else {
                continue;
            };
            match serde_json::from_str::<PendingLogin>(&raw) {
                Ok(p) if now - p.created_at <= PENDING_LOGIN_TTL_SECS => {
                    live.push((p.created_at, key))
                }
                _ => stale.push(key),
            }
        }
        if live.len() > keep {
            live.sort_unstable_by(|a, b| b.0.cmp(&a.0));
            stale.extend(live.drain(keep..).map(|(_, key)| key));
        }

        for key in &stale {
            self.store.delete(key);
        }
        if !stale.is_empty() {
            log::debug!("Removed {} stale pending login(s)", stale.len());
        }
        stale.len()
    }

    fn take_pending(&self, state: &str) -> Result<PendingLogin, LoginError> {
        let key = pending_key(state);
        let raw = self.store.get(&key).ok_or(LoginError::UnknownState)?;
        self.store.delete(&key);

        let pending: PendingLogin = serde_json::from_str(&raw).map_err(|e| {
            log::warn!("Discarding unreadable pending login: {e}");
            LoginError::UnknownState
        })?;
        if pending.state != state {
            return Err(LoginError::UnknownState);
        }
        if chrono::Utc::now().timestamp() - pending.created_at > PENDING_LOGIN_TTL_SECS {
            return Err(LoginError::ExpiredState);
        }
        Ok(pending)
    }

    async fn exchange_code(
        &self,
        code: &str,
        pending: &PendingLogin,
    ) -> Result<TokenResponse, LoginError> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("redirect_uri", pending.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("code_verifier", pending.code_verifier.as_str()),
        ];
        // Only confidential clients send a secret.
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.as_str()));
        }

        let response = self
            .http
            .post(&self.endpoints.token_endpoint)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::error!("Token request failed. Status: {status}, Body: {body}");
            return Err(match serde_json::from_str::<OAuthErrorResponse>(&body) {
                Ok(err) => LoginError::Rejected(err),
                Err(_) => LoginError::TokenEndpoint {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// `aud` may be a string or an array of strings. A token without `aud` is
/// accepted.
fn audience_includes(aud: Option<Value>, client_id: &str) -> bool {
    match aud {
        None => true,
        Some(Value::String(s)) => s == client_id,
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(client_id)),
        Some(_) => false,
    }
}
