use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Filesystem path for the durable store; `None` lets the storage
    /// backend pick its default.
    pub store_path: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_path = env::var("STORE_PATH").ok();
        Ok(Self { store_path })
    }
}
