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

//! Client-side OIDC session cache, login flow and REST client.
//!
//! Works on WASM (browser `localStorage`) and native targets (JSON file).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use authcache_client::{ApiClient, FileStore, LoginFlow, OidcConfig, Session, SessionCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(FileStore::new("/tmp/session.json"));
//! let config = OidcConfig::new(
//!     "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_abc",
//!     "client-id",
//!     "http://localhost:5173",
//! );
//! let flow = LoginFlow::discover(config, store.clone()).await?;
//! let session = Session::new(SessionCache::new(store), flow);
//!
//! if !session.is_signed_in() {
//!     let target = session.sign_in()?;
//!     println!("Open {}", target.url);
//!     return Ok(());
//! }
//!
//! let api = ApiClient::new("https://api.example.com", session.cache().clone());
//! println!("{}", api.ping().await?);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod login;
pub mod session;
pub mod store;

pub use api::{ApiClient, AuthScheme};
pub use authcache_types;
pub use cache::{SessionCache, SESSION_KEY};
pub use config::{ClientConfig, OidcConfig};
pub use error::{ApiError, ConfigError, LoginError};
pub use login::LoginFlow;
pub use session::Session;
pub use store::{FileStore, MemoryStore, SessionStore};
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
