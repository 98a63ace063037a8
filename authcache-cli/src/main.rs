use authcache_cli::cli_args::{Mode, Opt};
use authcache_cli::commands;
use authcache_client::ClientConfig;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also installs the `log` bridge, so the client crates' records show up here.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let opt = Opt::parse();
    let config = ClientConfig::from_env()?;
    let store = commands::open_store(opt.store_path.or(config.store_path.clone()))?;

    match opt.mode {
        Mode::Login => commands::login(&config, store).await?,
        Mode::Callback(c) => commands::callback(&config, store, c).await?,
        Mode::Status => println!("{}", commands::status(store)),
        Mode::Token => println!("{}", commands::token(store)?),
        Mode::Logout => match commands::logout(&config, store).await? {
            Some(url) => println!("Signed out. To end the provider session open:\n\n{url}"),
            None => println!("Signed out"),
        },
        Mode::Ping(p) => {
            let body = commands::ping(&config, store, p).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    };

    Ok(())
}
