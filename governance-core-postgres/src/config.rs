use anyhow::{Context, Result};
use dotenvy::dotenv;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::env;
use std::time::Duration;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: match env::var("DATABASE_MAX_CONNECTIONS") {
                Ok(value) => value
                    .parse()
                    .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
                Err(_) => DEFAULT_MAX_CONNECTIONS,
            },
        })
    }

    pub async fn connect(&self) -> Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&self.database_url)
            .await
            .context("Failed to connect to PostgreSQL")
    }
}
