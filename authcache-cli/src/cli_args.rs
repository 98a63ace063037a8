use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

/// authcache
///
/// Signs in to an OIDC identity provider, keeps the resulting session in a
/// local file and calls the API with the cached ID token.
///
/// The OIDC client is configured through OIDC_AUTHORITY, OIDC_CLIENT_ID,
/// OIDC_REDIRECT_URI (and optionally OIDC_LOGOUT_URI, OIDC_LOGOUT_DOMAIN,
/// OIDC_SCOPE, OIDC_CLIENT_SECRET).
#[derive(Parser, Debug)]
#[clap(name = "authcache")]
pub struct Opt {
    /// Session file. Defaults to the platform data directory.
    #[clap(long = "store-path", env = "AUTHCACHE_STORE_PATH", global = true)]
    pub store_path: Option<PathBuf>,

    #[clap(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Print the identity provider URL to open in a browser.
    Login,

    /// Complete a login with the URL the browser was redirected to.
    Callback(Callback),

    /// Show whether a session is cached and for whom.
    Status,

    /// Print the cached ID token.
    Token,

    /// Drop the cached session and print the provider logout URL.
    Logout,

    /// Call `GET /api/ping` with the cached token.
    Ping(Ping),
}

#[derive(Args, Debug, Clone)]
pub struct Callback {
    /// Full redirect URL, e.g. http://localhost:5173/?code=...&state=...
    pub url: Url,
}

#[derive(Args, Debug, Clone)]
pub struct Ping {
    /// API base URL. Falls back to API_ENDPOINT.
    #[clap(long = "endpoint")]
    pub endpoint: Option<Url>,

    /// Send `Authorization: Bearer <token>` instead of the raw token.
    #[clap(long = "bearer")]
    pub bearer: bool,
}
