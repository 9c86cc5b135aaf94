use eyre::Context;
use std::env;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
    Layer, Registry,
};

fn env_filter() -> Targets {
    env::var("RUST_LOG")
        .map_err(eyre::Report::from)
        .and_then(|targets| targets.parse().context("Failed to parse RUST_LOG value"))
        .unwrap_or_else(|_| Targets::default().with_default(LevelFilter::INFO))
}

pub fn initialise() -> eyre::Result<()> {
    let subscriber = Registry::default()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter()))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
        .context("Couldn't install the global tracing subscriber")?;

    Ok(())
}
