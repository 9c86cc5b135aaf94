use crate::{TrackingIdentity, TrackingService};
use tower::Layer;
use triomphe::Arc;

#[derive(Clone)]
pub struct TrackingLayer {
    identity: Arc<TrackingIdentity>,
}

impl TrackingLayer {
    #[must_use]
    pub fn new(identity: TrackingIdentity) -> Self {
        Self {
            identity: Arc::new(identity),
        }
    }
}

impl<S> Layer<S> for TrackingLayer {
    type Service = TrackingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TrackingService::new(inner, self.identity.clone())
    }
}
