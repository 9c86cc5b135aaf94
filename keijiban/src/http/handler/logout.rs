use crate::{consts::LOGOUT_MESSAGE, http::middleware::unauthorized};
use axum::response::Response;

/// Browsers forget cached Basic credentials once they see another challenge
pub async fn get() -> Response {
    unauthorized(LOGOUT_MESSAGE)
}
