use core_config::ConfigError;

/// Errors raised while connecting to or preparing the database
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Errors bubbling up from SeaORM
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Connection could not be established, even after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The connection is up but a probe query failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Environment configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Running migrations failed
    #[error("Migration error: {0}")]
    Migration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
