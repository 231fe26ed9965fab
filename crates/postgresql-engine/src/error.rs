//! Error types for the PostgreSQL engine.

use thiserror::Error;
use tokio_postgres::types::Type;

/// Errors that can occur while setting up the PostgreSQL engine.
#[derive(Error, Debug)]
pub enum PostgreSQLEngineError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),
}

/// A fixture value that cannot be bound to a statement parameter.
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("cannot bind {found} to a parameter of type {ty}")]
    Mismatch { found: &'static str, ty: Type },

    #[error("value {value} is out of range for type {ty}")]
    OutOfRange { value: String, ty: Type },

    #[error("invalid {ty} value {value:?}: {reason}")]
    Invalid {
        value: String,
        ty: Type,
        reason: String,
    },
}
