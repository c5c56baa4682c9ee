use configuration::ConfigError;
use thiserror::Error;

/// Every failure the gateway can report.
///
/// The `Display` text is what the user sees in the error area, so each
/// variant says which step failed before the underlying cause.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Error connecting to the database: {0}")]
    Config(#[from] ConfigError),

    #[error("Error connecting to the database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Error creating table: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("Error executing query: {0}")]
    Query(#[source] sqlx::Error),
}

impl DbError {
    /// True for failures that happened before any SQL was sent.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, DbError::Config(_) | DbError::Connection(_))
    }
}
