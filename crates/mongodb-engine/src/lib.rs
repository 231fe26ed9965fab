//! MongoDB engine for polluter.
//!
//! Each top-level collection becomes one bulk insert carrying every document
//! of the fixture. Collections are inserted in document order without a
//! transaction; a failure leaves earlier collections in place.

pub mod args;
pub mod engine;
pub mod error;
pub mod insert;

pub use args::MongoDBPolluteArgs;
pub use engine::MongoDBEngine;
pub use error::MongoDBEngineError;
pub use insert::{build_documents, DocumentCommand};
