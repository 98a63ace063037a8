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

//! Sign-in / sign-out on top of the cache and the login flow.
//!
//! Checking whether the user is signed in never starts a login; starting a
//! login is a separate command.

use authcache_types::{CallbackPayload, RedirectTarget, SessionRecord};
use url::Url;

use crate::cache::SessionCache;
use crate::error::LoginError;
use crate::login::LoginFlow;

#[derive(Debug)]
pub struct Session {
    cache: SessionCache,
    flow: LoginFlow,
}

impl Session {
    pub fn new(cache: SessionCache, flow: LoginFlow) -> Self {
        Self { cache, flow }
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn flow(&self) -> &LoginFlow {
        &self.flow
    }

    pub fn is_signed_in(&self) -> bool {
        self.cache.is_signed_in()
    }

    /// Start a login. Send the user to the returned URL.
    pub fn sign_in(&self) -> Result<RedirectTarget, LoginError> {
        self.flow.begin_login()
    }

    /// Finish a login and cache the resulting record.
    ///
    /// On failure the cache is left as it was.
    pub async fn handle_callback(
        &self,
        payload: CallbackPayload,
    ) -> Result<SessionRecord, LoginError> {
        match self.flow.complete_login(payload).await {
            Ok(record) => {
                self.cache.set_record(&record);
                log::info!("User logged in: {}", self.cache.display_name());
                Ok(record)
            }
            Err(e) => {
                log::error!("Login callback failed: {e}");
                Err(e)
            }
        }
    }

    /// Drop the cached record and return the provider logout URL, if any.
    pub fn sign_out(&self) -> Option<Url> {
        self.cache.clear_record();
        self.flow.logout_url()
    }
}
