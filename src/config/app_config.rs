use core::fmt;
use std::env;

use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::error::QuizError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Dev,
    Prod,
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runtime::Dev => write!(f, "development"),
            Runtime::Prod => write!(f, "production"),
        }
    }
}

impl From<String> for Runtime {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PRODUCTION" => Runtime::Prod,
            _ => Runtime::Dev,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

fn default_max_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl AppConfig {
    /// Layers `config/<runtime>.toml` (optional) under `QUIZ__*` environment
    /// variables, after reading any `.env` file.
    pub fn load() -> Result<Self, QuizError> {
        dotenv().ok();

        let runtime: Runtime = env::var("ENVIRONMENT").unwrap_or_default().into();

        let config: AppConfig = Config::builder()
            .add_source(File::with_name(&format!("config/{}", runtime)).required(false))
            .add_source(Environment::with_prefix("QUIZ").separator("__"))
            .build()?
            .try_deserialize()?;

        debug!(
            "Loaded {} config, max connections: {}",
            runtime, config.database.max_connections
        );

        Ok(config)
    }
}
