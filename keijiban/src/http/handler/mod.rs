use crate::consts::NOT_FOUND_MESSAGE;
use axum::response::IntoResponse;
use http::StatusCode;

pub mod logout;
pub mod posts;

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}
