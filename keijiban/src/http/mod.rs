use crate::{signal::Receiver as ShutdownReceiver, state::Zustand};
use axum::body::Body;
use eyre::Context;
use http::{HeaderName, Request};
use keijiban_config::server;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::Span;

pub mod extractor;
mod form;
mod handler;
mod middleware;
mod router;

pub use self::router::create as create_router;

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn make_span(request: &Request<Body>) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = ?request.headers().get(&X_REQUEST_ID),
    )
}

#[instrument(skip_all, fields(port = %server_config.port))]
pub async fn run(
    state: Zustand,
    server_config: server::Configuration,
    shutdown_signal: ShutdownReceiver,
) -> eyre::Result<()> {
    let router = router::create(state, &server_config);
    let listener = TcpListener::bind(("0.0.0.0", server_config.port))
        .await
        .wrap_err("Failed to bind the listener")?;

    info!("starting up server");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal.wait())
    .await?;

    Ok(())
}
