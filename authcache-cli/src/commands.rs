use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use authcache_client::authcache_types::CallbackPayload;
use authcache_client::login::logout_domain_url;
use authcache_client::{
    ApiClient, AuthScheme, ClientConfig, FileStore, LoginFlow, Session, SessionCache, SessionStore,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::cli_args::{Callback, Ping};

/// Open the file store at `path`, or at the platform default location.
pub fn open_store(path: Option<PathBuf>) -> anyhow::Result<Arc<dyn SessionStore>> {
    let path = path
        .or_else(FileStore::default_path)
        .ok_or_else(|| anyhow!("no data directory on this platform, pass --store-path"))?;
    debug!("Using session store at {}", path.display());
    Ok(Arc::new(FileStore::new(path)))
}

async fn session(config: &ClientConfig, store: Arc<dyn SessionStore>) -> anyhow::Result<Session> {
    let oidc = config
        .oidc
        .clone()
        .ok_or_else(|| anyhow!("OIDC is not configured, set OIDC_CLIENT_ID"))?;
    let flow = LoginFlow::discover(oidc, store.clone())
        .await
        .context("failed to load identity provider configuration")?;
    Ok(Session::new(SessionCache::new(store), flow))
}

pub async fn login(config: &ClientConfig, store: Arc<dyn SessionStore>) -> anyhow::Result<()> {
    let session = session(config, store).await?;
    if session.is_signed_in() {
        println!("Already signed in as {}", session.cache().display_name());
        return Ok(());
    }
    let target = session.sign_in()?;
    println!("Open this URL in a browser to sign in:\n\n{}\n", target.url);
    println!("Then run `authcache callback '<redirected URL>'`.");
    Ok(())
}

pub async fn callback(
    config: &ClientConfig,
    store: Arc<dyn SessionStore>,
    args: Callback,
) -> anyhow::Result<()> {
    let session = session(config, store).await?;
    let payload = CallbackPayload::from_url(args.url.as_str())?;
    session.handle_callback(payload).await?;
    println!("Signed in as {}", session.cache().display_name());
    Ok(())
}

pub fn status(store: Arc<dyn SessionStore>) -> String {
    let cache = SessionCache::new(store);
    if !cache.is_signed_in() {
        return "Not signed in".to_string();
    }
    match cache.display_name() {
        name if name.is_empty() => "Signed in".to_string(),
        name => format!("Signed in as {name}"),
    }
}

pub fn token(store: Arc<dyn SessionStore>) -> anyhow::Result<String> {
    let token = SessionCache::new(store).bearer_token();
    if token.is_empty() {
        bail!("not signed in");
    }
    Ok(token)
}

/// Clear the cached session, then work out a provider logout URL if one is
/// available. The local sign-out never depends on reaching the provider.
pub async fn logout(
    config: &ClientConfig,
    store: Arc<dyn SessionStore>,
) -> anyhow::Result<Option<Url>> {
    SessionCache::new(store.clone()).clear_record();

    let Some(oidc) = config.oidc.clone() else {
        return Ok(None);
    };
    if let Some(url) = logout_domain_url(&oidc) {
        return Ok(Some(url));
    }
    match LoginFlow::discover(oidc, store).await {
        Ok(flow) => Ok(flow.logout_url()),
        Err(e) => {
            warn!("Could not load identity provider configuration, skipping provider logout: {e}");
            Ok(None)
        }
    }
}

/// `--endpoint` if given, else `API_ENDPOINT`.
pub fn resolve_endpoint(args: &Ping, config: &ClientConfig) -> anyhow::Result<Url> {
    if let Some(endpoint) = &args.endpoint {
        return Ok(endpoint.clone());
    }
    let raw = config
        .api_endpoint
        .as_deref()
        .ok_or_else(|| anyhow!("no API endpoint, pass --endpoint or set API_ENDPOINT"))?;
    Url::parse(raw).with_context(|| format!("API_ENDPOINT is not a valid URL: {raw}"))
}

pub async fn ping(
    config: &ClientConfig,
    store: Arc<dyn SessionStore>,
    args: Ping,
) -> anyhow::Result<serde_json::Value> {
    let endpoint = resolve_endpoint(&args, config)?;
    let scheme = if args.bearer {
        AuthScheme::Bearer
    } else {
        AuthScheme::Raw
    };
    let client = ApiClient::new(endpoint.as_str(), SessionCache::new(store)).with_scheme(scheme);
    info!("Pinging {endpoint}");
    Ok(client.ping().await?)
}
