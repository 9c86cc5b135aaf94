use crate::{Error, ErrorType};
use axum_core::response::{IntoResponse, Response};
use http::StatusCode;

#[inline]
fn to_response<B>(status_code: StatusCode, maybe_body: Option<B>) -> Response
where
    B: IntoResponse,
{
    maybe_body.map_or_else(
        || status_code.into_response(),
        |body| (status_code, body).into_response(),
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.ty {
            ErrorType::BadRequest(maybe_body) => {
                debug!(error = ?self.inner, "rejecting bad request");
                to_response(StatusCode::BAD_REQUEST, maybe_body)
            }
            ErrorType::Other(maybe_body) => {
                error!(error = ?self.inner, "request failed");
                to_response(StatusCode::INTERNAL_SERVER_ERROR, maybe_body)
            }
        }
    }
}
