use crate::{tokens_match, OneTimeToken, TokenStore};
use dashmap::DashMap;
use keijiban_error::Result;
use triomphe::Arc;

/// Process-local token store
///
/// Replacing and compare-and-removing are atomic per subject.
/// Concurrent issues for the same subject resolve to whichever write lands last.
#[derive(Clone, Default)]
pub struct InMemory {
    inner: Arc<DashMap<String, OneTimeToken>>,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemory {
    async fn issue(&self, subject: &str) -> Result<OneTimeToken> {
        let token = OneTimeToken::generate();
        self.inner.insert(subject.to_string(), token.clone());

        Ok(token)
    }

    async fn consume(&self, subject: &str, presented: &str) -> Result<bool> {
        let removed = self
            .inner
            .remove_if(subject, |_, stored| tokens_match(stored.as_str(), presented));

        Ok(removed.is_some())
    }
}
