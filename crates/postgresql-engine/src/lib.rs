//! PostgreSQL engine for polluter.
//!
//! Records are inserted one statement per record inside a single
//! transaction. Each statement is prepared first so that every argument can
//! be encoded as the column type the server expects.

pub mod args;
pub mod dialect;
pub mod engine;
pub mod error;
mod value;

pub use args::PostgreSQLPolluteArgs;
pub use dialect::PostgreSQLDialect;
pub use engine::PostgreSQLEngine;
pub use error::{ParamError, PostgreSQLEngineError};
