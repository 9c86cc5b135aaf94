use crate::{auth::UserDirectory, consts::AUTH_REALM};
use ashiato::Subject;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use headers::{authorization::Basic, Authorization, HeaderMapExt};
use http::{header, HeaderValue, StatusCode};
use keijiban_error::Result;

/// Challenge the client for Basic credentials
pub fn unauthorized<B>(body: B) -> Response
where
    B: IntoResponse,
{
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM))],
        body,
    )
        .into_response()
}

/// Attach the authenticated username to the request as its [`Subject`]
pub async fn basic_auth(
    State(users): State<UserDirectory>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let Some(Authorization(credentials)) = req.headers().typed_get::<Authorization<Basic>>()
    else {
        return Ok(unauthorized(()));
    };

    if !users
        .verify(credentials.username(), credentials.password())
        .await?
    {
        info!(user = %credentials.username(), "rejected credentials");
        return Ok(unauthorized(()));
    }

    req.extensions_mut()
        .insert(Subject::from(credentials.username()));

    Ok(next.run(req).await)
}
