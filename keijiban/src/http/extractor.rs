use axum::extract::{ConnectInfo, FromRequestParts};
use http::{header, request::Parts};
use std::{convert::Infallible, net::SocketAddr};

/// Details about the client recorded in audit logs
#[derive(Clone, Debug)]
pub struct ClientInfo {
    /// Only known when the server was started with connect info
    pub remote_address: Option<SocketAddr>,
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let remote_address = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(address)| *address);

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        Ok(Self {
            remote_address,
            user_agent,
        })
    }
}
