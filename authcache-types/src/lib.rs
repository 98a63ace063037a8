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

//! Shared types for authcache.
//!
//! This crate defines the cached session record and the values exchanged with
//! an OIDC identity provider during the two-step login. It has no I/O and no
//! HTTP client, so UI crates and tests can depend on it freely.

pub mod error;
pub mod login;
pub mod record;
pub mod responses;

pub use error::OAuthErrorResponse;
pub use login::{CallbackParseError, CallbackPayload, RedirectTarget};
pub use record::{Profile, SessionRecord};
pub use responses::{ProviderMetadata, TokenResponse};
