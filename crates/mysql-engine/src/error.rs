//! Error types for the MySQL engine.

use thiserror::Error;

/// Errors that can occur while setting up the MySQL engine.
#[derive(Error, Debug)]
pub enum MySQLEngineError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),
}
