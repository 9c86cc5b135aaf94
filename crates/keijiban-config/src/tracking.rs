use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, time::Duration};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Ten years
pub const MAX_COOKIE_MAX_AGE_HOURS: u64 = 24 * 365 * 10;

fn default_cookie_max_age_hours() -> u64 {
    24
}

fn deserialize_cookie_max_age_hours<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let hours = u64::deserialize(deserializer)?;
    if !(1..=MAX_COOKIE_MAX_AGE_HOURS).contains(&hours) {
        return Err(de::Error::custom(format_args!(
            "cookie-max-age-hours must be between 1 and {MAX_COOKIE_MAX_AGE_HOURS}"
        )));
    }

    Ok(hours)
}

/// Key material that never shows up in logs
#[derive(Clone, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(try_from = "String", into = "String")]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Secret {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err("the tracking secret must not be empty");
        }

        Ok(Self(value))
    }
}

impl From<Secret> for String {
    fn from(value: Secret) -> Self {
        value.0.clone()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    #[serde(
        default = "default_cookie_max_age_hours",
        deserialize_with = "deserialize_cookie_max_age_hours"
    )]
    pub cookie_max_age_hours: u64,
    pub secret: Secret,
}

impl Configuration {
    #[must_use]
    pub fn cookie_max_age(&self) -> Duration {
        self.cookie_max_age_hours
            .checked_mul(60 * 60)
            .map_or(Duration::MAX, Duration::from_secs)
    }
}
