//! Signed tracking identifiers carried in a cookie
//!
//! Every request that passes through [`TrackingLayer`] ends up with a [`TrackingId`] in its extensions.
//! The identifier presented by the client is kept as long as its signature matches the [`Subject`]
//! of the request, otherwise a new one is minted and written back through `Set-Cookie`.

#[macro_use]
extern crate tracing;

pub use self::{
    future::ResponseFuture,
    identity::{Ensured, TrackingIdentity, DEFAULT_MAX_AGE},
    layer::TrackingLayer,
    newtypes::*,
    service::TrackingService,
    signer::{HashSigner, SIGNATURE_LEN},
};

mod future;
mod identity;
mod layer;
mod service;
mod signer;

pub const TRACKING_COOKIE_NAME: &str = "tracking_id";

mod newtypes {
    #[aliri_braid::braid]
    pub struct Signature;

    /// Name the authentication layer attached to the request
    #[aliri_braid::braid]
    pub struct Subject;

    #[aliri_braid::braid]
    pub struct TrackingId;
}

#[cfg(feature = "axum")]
mod axum_impl {
    use crate::{Subject, TrackingId};
    use axum_core::{
        extract::FromRequestParts,
        response::{IntoResponse, Response},
    };
    use http::{request::Parts, StatusCode};

    /// The request didn't pass through the layers that attach this value
    #[derive(Debug)]
    pub struct MissingExtension(&'static str);

    impl IntoResponse for MissingExtension {
        fn into_response(self) -> Response {
            error!(extension = self.0, "service not wrapped by the required middleware");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }

    macro_rules! impl_from_extension {
        ($($ty:ty),+ $(,)?) => {
            $(
                impl<S> FromRequestParts<S> for $ty
                where
                    S: Sync,
                {
                    type Rejection = MissingExtension;

                    async fn from_request_parts(
                        parts: &mut Parts,
                        _state: &S,
                    ) -> Result<Self, Self::Rejection> {
                        parts
                            .extensions
                            .get::<Self>()
                            .cloned()
                            .ok_or(MissingExtension(stringify!($ty)))
                    }
                }
            )+
        };
    }

    impl_from_extension!(Subject, TrackingId);
}

#[cfg(feature = "axum")]
pub use self::axum_impl::MissingExtension;
