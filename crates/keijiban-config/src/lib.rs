#![forbid(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, forbidden_lint_groups)]

pub mod auth;
pub mod server;
pub mod token_store;
pub mod tracking;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub auth: auth::Configuration,
    pub server: server::Configuration,
    #[serde(default)]
    pub token_store: token_store::Configuration,
    pub tracking: tracking::Configuration,
}

impl Configuration {
    pub async fn load<P>(path: P) -> eyre::Result<Self>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> eyre::Result<Self> {
        toml::from_str(content).map_err(eyre::Report::from)
    }
}
