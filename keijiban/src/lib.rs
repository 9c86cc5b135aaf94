#![forbid(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    forbidden_lint_groups
)]

#[macro_use]
extern crate tracing;

pub mod auth;
pub mod consts;
pub mod http;
pub mod signal;
pub mod state;
mod template;

use self::{auth::UserDirectory, state::Zustand};
use ashiato::{HashSigner, TrackingIdentity};
use eyre::Context;
use keijiban_config::Configuration;
use keijiban_post::InMemoryPostStore;
use std::sync::Arc;

#[must_use]
pub fn tracking_identity(config: &keijiban_config::tracking::Configuration) -> TrackingIdentity {
    let signer = HashSigner::new(config.secret.expose().as_bytes());
    TrackingIdentity::new(signer).with_max_age(config.cookie_max_age())
}

pub async fn initialise_state(config: &Configuration) -> eyre::Result<Zustand> {
    let tokens = keijiban_token::prepare(&config.token_store)
        .await
        .wrap_err("Failed to prepare the one-time token store")?;

    Ok(Zustand {
        posts: Arc::new(InMemoryPostStore::new()),
        tokens,
        tracking: tracking_identity(&config.tracking),
        users: UserDirectory::from_config(&config.auth),
    })
}
