use crate::auth::UserDirectory;
use ashiato::TrackingIdentity;
use axum::extract::FromRef;
use keijiban_post::ArcPostStore;
use keijiban_token::AnyTokenStore;

/// Application state
///
/// Called it "Zustand" to avoid a name collission with `axum::extract::State`.
#[derive(Clone, FromRef)]
pub struct Zustand {
    pub posts: ArcPostStore,
    pub tokens: AnyTokenStore,
    pub tracking: TrackingIdentity,
    pub users: UserDirectory,
}
