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

//! OIDC authorization-code login with PKCE, split into two steps:
//! [`LoginFlow::begin_login`] and [`LoginFlow::complete_login`].

pub mod discovery;
pub mod flow;
pub mod id_token;

pub use discovery::discover_provider;
pub use flow::{
    logout_domain_url, LoginFlow, PendingLogin, MAX_PENDING_LOGINS, PENDING_LOGIN_TTL_SECS,
};
pub use id_token::decode_id_token_profile;
