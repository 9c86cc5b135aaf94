use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use keijiban_config::auth;
use keijiban_error::{Error, Result};
use smol_str::SmolStr;
use std::collections::HashMap;
use triomphe::Arc;

/// Accounts allowed onto the board, keyed by username
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<HashMap<SmolStr, String>>,
}

impl UserDirectory {
    #[must_use]
    pub fn from_config(config: &auth::Configuration) -> Self {
        let users = config
            .users
            .iter()
            .map(|user| (user.username.clone(), user.password_hash.clone()))
            .collect();

        Self {
            users: Arc::new(users),
        }
    }

    /// Check the password against the stored Argon2 hash
    ///
    /// Unknown usernames are rejected without hashing anything.
    #[instrument(skip_all, fields(%username))]
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let Some(password_hash) = self.users.get(username).cloned() else {
            debug!("unknown user");
            return Ok(false);
        };
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let password_hash = PasswordHash::new(&password_hash).map_err(Error::msg)?;

            Ok::<_, Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &password_hash)
                    .is_ok(),
            )
        })
        .await?
    }
}

/// Produce a PHC string suitable for the `password-hash` field of a user entry
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(rand::thread_rng());

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(Error::msg)
}
