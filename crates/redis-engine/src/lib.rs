//! Redis engine for polluter.
//!
//! Every top-level key of a fixture is stored as the JSON encoding of its
//! value, whatever its shape.

pub mod args;
pub mod engine;
pub mod error;
pub mod set;

pub use args::RedisPolluteArgs;
pub use engine::RedisEngine;
pub use error::RedisEngineError;
pub use set::{build_sets, SetCommand};
