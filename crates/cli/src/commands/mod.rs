//! Command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use techshop_storefront::config::{ConfigError, get_database_url};
use techshop_storefront::db::RepositoryError;

/// Errors a CLI command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Validation(usize),
}

/// Load `.env` and resolve the storefront database URL.
fn database_url() -> Result<SecretString, CommandError> {
    let _ = dotenvy::dotenv();
    Ok(get_database_url("STOREFRONT_DATABASE_URL")?)
}
