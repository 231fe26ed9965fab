//! MySQL engine for polluter.
//!
//! Records are inserted one statement per record, all inside a single
//! transaction: either every fixture row lands or none does.

pub mod args;
pub mod dialect;
pub mod engine;
pub mod error;
mod value;

pub use args::MySQLPolluteArgs;
pub use dialect::MySQLDialect;
pub use engine::MySQLEngine;
pub use error::MySQLEngineError;
