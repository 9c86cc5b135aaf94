use serde::{Deserialize, Serialize};

fn default_max_body_size() -> usize {
    1024 * 1024
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    pub port: u16,
    pub request_timeout_secs: u64,
}
