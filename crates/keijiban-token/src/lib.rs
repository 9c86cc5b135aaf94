//! Single-use tokens guarding form submissions
//!
//! Every rendered form gets a fresh token bound to the subject that requested it.
//! A submission is accepted only if it presents the token that is *currently* stored for its subject,
//! and accepting it removes the token. Issuing a new token replaces the previous one, so of two pages
//! rendered for the same subject only the most recent one can be submitted.

#[macro_use]
extern crate tracing;

use enum_dispatch::enum_dispatch;
use fred::{clients::RedisPool, interfaces::ClientLike, types::RedisConfig};
use hex_simd::AsciiCase;
use keijiban_config::token_store;
use keijiban_error::Result;
use subtle::ConstantTimeEq;

pub use self::{in_memory::InMemory as InMemoryTokenStore, redis::Redis as RedisTokenStore};

mod in_memory;
mod redis;

/// Number of random bytes in a token (hex-encoded, so twice as many characters)
pub const TOKEN_BYTES: usize = 8;

#[aliri_braid::braid]
pub struct OneTimeToken;

impl OneTimeToken {
    #[must_use]
    pub fn generate() -> Self {
        let bytes = rand::random::<[u8; TOKEN_BYTES]>();
        hex_simd::encode_to_string(bytes, AsciiCase::Lower).into()
    }
}

#[inline]
fn tokens_match(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

#[derive(Clone)]
#[enum_dispatch(TokenStore)]
pub enum AnyTokenStore {
    InMemory(InMemoryTokenStore),
    Redis(RedisTokenStore),
}

#[enum_dispatch]
#[allow(async_fn_in_trait)] // Because of `enum_dispatch`
pub trait TokenStore {
    /// Mint a token for the subject, invalidating whatever token it held before
    async fn issue(&self, subject: &str) -> Result<OneTimeToken>;

    /// Remove the subject's token if it equals the presented one
    ///
    /// Returns `false` without touching the store on any mismatch, including when no token is stored.
    async fn consume(&self, subject: &str, presented: &str) -> Result<bool>;
}

pub async fn prepare(config: &token_store::Configuration) -> eyre::Result<AnyTokenStore> {
    let store = match config {
        token_store::Configuration::InMemory => InMemoryTokenStore::new().into(),
        token_store::Configuration::Redis(redis_config) => {
            let config = RedisConfig::from_url(redis_config.url.as_str())?;
            let pool = RedisPool::new(config, None, None, None, 10)?;
            pool.init().await?;

            RedisTokenStore::new(pool).into()
        }
    };

    Ok(store)
}

#[cfg(test)]
mod test {
    use super::{tokens_match, OneTimeToken, TOKEN_BYTES};

    #[test]
    fn token_shape() {
        let token = OneTimeToken::generate();

        assert_eq!(token.as_str().len(), TOKEN_BYTES * 2);
        assert!(token
            .as_str()
            .bytes()
            .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte)));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(OneTimeToken::generate(), OneTimeToken::generate());
    }

    #[test]
    fn comparison() {
        assert!(tokens_match("0123abcd", "0123abcd"));
        assert!(!tokens_match("0123abcd", "0123ABCD"));
        assert!(!tokens_match("0123abcd", "0123abc"));
        assert!(!tokens_match("0123abcd", ""));
    }
}
