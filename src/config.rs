// Configuration loading with the 'config' crate and 'dotenv'

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server_address: String,
    // Base URL of the dealership REST backend
    pub backend_url: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            .set_default("server_address", "127.0.0.1:3000")?
            .set_default("backend_url", DEFAULT_BACKEND_URL)?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_BACKEND_URL)
            .add_source(Environment::with_prefix("APP").prefix_separator("_"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}
