use super::{handler, make_span, middleware, X_REQUEST_ID};
use crate::{consts::POSTS_PATH, state::Zustand};
use ashiato::TrackingLayer;
use axum::{extract::DefaultBodyLimit, routing, Router};
use http::StatusCode;
use keijiban_config::server;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub fn create(state: Zustand, server_config: &server::Configuration) -> Router {
    // Authentication has to run before tracking, the identifier is bound to the subject
    let board = Router::new()
        .route(
            POSTS_PATH,
            routing::get(handler::posts::get)
                .post(handler::posts::post)
                .fallback(handler::posts::unsupported),
        )
        .layer(TrackingLayer::new(state.tracking.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::basic_auth,
        ));

    Router::new()
        .merge(board)
        .route("/logout", routing::get(handler::logout::get))
        .fallback(handler::not_found)
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server_config.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
        .layer(SetRequestIdLayer::new(
            X_REQUEST_ID.clone(),
            MakeRequestUuid,
        ))
        .with_state(state)
}
