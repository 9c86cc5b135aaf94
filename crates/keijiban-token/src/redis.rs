use crate::{OneTimeToken, TokenStore};
use fred::{
    clients::RedisPool,
    interfaces::{KeysInterface, LuaInterface},
};
use keijiban_error::Result;

const REDIS_PREFIX: &str = "ONE-TIME-TOKEN";

/// Deletes the key only while it still holds the presented token
const CONSUME_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Token store shared between several instances of the service
#[derive(Clone)]
pub struct Redis {
    pool: RedisPool,
}

impl Redis {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    #[inline]
    fn format_key(subject: &str) -> String {
        format!("{REDIS_PREFIX}:{subject}")
    }
}

impl TokenStore for Redis {
    #[instrument(skip_all, fields(%subject))]
    async fn issue(&self, subject: &str) -> Result<OneTimeToken> {
        let token = OneTimeToken::generate();
        self.pool
            .set::<(), _, _>(
                Self::format_key(subject),
                token.as_str(),
                None,
                None,
                false,
            )
            .await?;

        Ok(token)
    }

    #[instrument(skip_all, fields(%subject))]
    async fn consume(&self, subject: &str, presented: &str) -> Result<bool> {
        let deleted: i64 = self
            .pool
            .eval(
                CONSUME_SCRIPT,
                vec![Self::format_key(subject)],
                vec![presented.to_string()],
            )
            .await?;

        debug!(accepted = deleted == 1, "consumed one-time token");

        Ok(deleted == 1)
    }
}
