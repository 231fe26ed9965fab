//! Error types for the MongoDB engine.

use thiserror::Error;

/// Errors that can occur while setting up the MongoDB engine.
#[derive(Error, Debug)]
pub enum MongoDBEngineError {
    /// MongoDB connection or query error.
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),
}
