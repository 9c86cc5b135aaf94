use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, Context};
use keijiban::consts::VERSION;
use keijiban_config::{token_store, Configuration};
use std::path::PathBuf;

#[derive(Subcommand)]
enum AppSubcommand {
    /// Hash a password for the `auth.users` section of the configuration
    HashPassword {
        password: String,
    },

    /// Parse a configuration file and print a summary of it
    CheckConfig {
        /// Path to the configuration file
        #[clap(long, short)]
        config: PathBuf,
    },
}

/// Administrative helpers for the keijiban server
#[derive(Parser)]
#[command(about, author, version = VERSION)]
struct App {
    #[clap(subcommand)]
    subcommand: AppSubcommand,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let app = App::parse();

    match app.subcommand {
        AppSubcommand::HashPassword { password } => {
            let hash = keijiban::auth::hash_password(&password)
                .map_err(keijiban_error::Error::into_error)?;
            println!("{hash}");
        }
        AppSubcommand::CheckConfig { config } => {
            let config = Configuration::load(&config)
                .await
                .wrap_err("Invalid configuration")?;

            let token_store = match config.token_store {
                token_store::Configuration::InMemory => "in-memory",
                token_store::Configuration::Redis(..) => "redis",
            };

            println!("port: {}", config.server.port);
            println!("users: {}", config.auth.users.len());
            println!("token store: {token_store}");
            println!("tracking cookie max age: {}h", config.tracking.cookie_max_age_hours);
        }
    }

    Ok(())
}
