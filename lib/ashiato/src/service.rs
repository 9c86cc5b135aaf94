use crate::{ResponseFuture, Subject, TrackingIdRef, TrackingIdentity, TRACKING_COOKIE_NAME};
use cookie::{Cookie, SameSite};
use http::{header, HeaderMap, HeaderValue, Request, Response};
use std::task::{self, Poll};
use time::OffsetDateTime;
use tower::Service;
use triomphe::Arc;

#[derive(Clone)]
pub struct TrackingService<S> {
    inner: S,
    identity: Arc<TrackingIdentity>,
}

impl<S> TrackingService<S> {
    pub fn new(inner: S, identity: Arc<TrackingIdentity>) -> Self {
        Self { inner, identity }
    }
}

fn read_cookie(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(header::COOKIE) {
        let Ok(value_str) = header.to_str() else {
            continue;
        };

        for cookie in Cookie::split_parse_encoded(value_str) {
            let Ok(cookie) = cookie else {
                continue;
            };

            if cookie.name() == TRACKING_COOKIE_NAME {
                return Some(cookie.value_trimmed().to_string());
            }
        }
    }

    None
}

fn build_set_cookie(value: &str, identity: &TrackingIdentity) -> Option<HeaderValue> {
    let max_age = time::Duration::try_from(identity.max_age()).ok()?;
    let expires = OffsetDateTime::now_utc().checked_add(max_age)?;
    let cookie = Cookie::build((TRACKING_COOKIE_NAME, value))
        .expires(expires)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    HeaderValue::from_str(&cookie.encoded().to_string()).ok()
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TrackingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let Some(subject) = req.extensions().get::<Subject>().cloned() else {
            debug!("no subject attached to request, skipping tracking");
            return ResponseFuture {
                inner: self.inner.call(req),
                set_cookie: None,
            };
        };

        let presented = read_cookie(req.headers());
        let ensured = self.identity.ensure(
            presented.as_deref().map(TrackingIdRef::from_str),
            subject.as_str(),
        );

        let set_cookie = if ensured.is_fresh {
            debug!(%subject, "issued new tracking id");
            let header_value = build_set_cookie(ensured.tracking_id.as_str(), &self.identity);
            if header_value.is_none() {
                error!("failed to encode tracking cookie");
            }
            header_value
        } else {
            None
        };

        req.extensions_mut().insert(ensured.tracking_id);

        ResponseFuture {
            inner: self.inner.call(req),
            set_cookie,
        }
    }
}
