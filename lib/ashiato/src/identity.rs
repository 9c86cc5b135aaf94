use crate::{HashSigner, TrackingId, TrackingIdRef};
use std::time::Duration;

/// Default lifetime of the tracking cookie
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24);

/// Outcome of [`TrackingIdentity::ensure`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ensured {
    pub tracking_id: TrackingId,
    /// Whether the identifier was minted for this request and still has to reach the client
    pub is_fresh: bool,
}

/// Issues and validates `<original id>_<signature>` identifiers
#[derive(Clone)]
pub struct TrackingIdentity {
    signer: HashSigner,
    max_age: Duration,
}

impl TrackingIdentity {
    #[must_use]
    pub fn new(signer: HashSigner) -> Self {
        Self {
            signer,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    #[must_use]
    pub fn with_max_age(self, max_age: Duration) -> Self {
        Self { max_age, ..self }
    }

    #[must_use]
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Check whether the identifier was signed for this subject
    ///
    /// Everything before the first `_` is the original ID, everything after it the claimed signature.
    /// A value without separator has an empty signature half, which never verifies.
    #[must_use]
    pub fn is_valid(&self, tracking_id: &TrackingIdRef, subject: &str) -> bool {
        let value = tracking_id.as_str();
        if value.is_empty() {
            return false;
        }

        let (original_id, claimed_signature) = value.split_once('_').unwrap_or((value, ""));
        self.signer.verify(original_id, subject, claimed_signature)
    }

    /// Mint a new identifier for the subject
    #[must_use]
    pub fn issue(&self, subject: &str) -> TrackingId {
        let original_id = rand::random::<u64>().to_string();
        let signature = self.signer.sign(&original_id, subject);

        format!("{original_id}_{signature}").into()
    }

    /// Keep a valid identifier, replace anything else
    #[must_use]
    pub fn ensure(&self, presented: Option<&TrackingIdRef>, subject: &str) -> Ensured {
        match presented {
            Some(tracking_id) if self.is_valid(tracking_id, subject) => Ensured {
                tracking_id: tracking_id.to_owned(),
                is_fresh: false,
            },
            _ => Ensured {
                tracking_id: self.issue(subject),
                is_fresh: true,
            },
        }
    }
}
