use thiserror::Error;

/// The driver error carried by [`DbError`], re-exported for callers that build one.
pub use sqlx::Error as SqlxError;

/// Failures surfaced by the connection provider and the CRUD operations.
///
/// There is no "not found" variant: an absent row is an empty
/// `Stock` or an affected-count of zero, never an error.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    /// The database could not be reached, authenticated against, or pinged.
    #[error("Failed to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    /// The database rejected or aborted a statement.
    #[error("Database operation failed: {0}")]
    Operation(#[source] sqlx::Error),
}

impl DbError {
    /// True when the failure lies between us and the database rather than in a statement.
    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::Connection(_) | DbError::ConnectionConfigError(_))
    }
}
