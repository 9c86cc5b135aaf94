use clap::Parser;
use color_eyre::eyre::{self, Context};
use keijiban::consts::VERSION;
use keijiban_config::Configuration;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Anonymous message board behind Basic authentication
#[derive(Parser)]
#[command(about, author, version = VERSION)]
struct Args {
    /// Path to the configuration file
    #[clap(long, short)]
    config: PathBuf,
}

async fn boot() -> eyre::Result<()> {
    let args = Args::parse();
    let config = Configuration::load(&args.config)
        .await
        .wrap_err_with(|| format!("Failed to load configuration from {}", args.config.display()))?;
    keijiban_observability::initialise()?;

    let state = keijiban::initialise_state(&config).await?;
    let shutdown_signal = keijiban::signal::shutdown();

    keijiban::http::run(state, config.server.clone(), shutdown_signal).await
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(boot())
}
