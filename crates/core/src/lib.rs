//! Core types for polluter.
//!
//! A fixture document is parsed into a [`Tree`], compiled by a backend
//! [`Engine`] into an ordered list of commands, and those commands are then
//! applied to a live database by the same engine.
//!
//! # Modules
//!
//! - [`tree`] - ordered fixture tree and its walker
//! - [`parser`] - JSON and YAML parsers
//! - [`engine`] - the builder/executor contract
//! - [`sql`] - relational builder shared by the SQL dialects
//! - [`error`] - error taxonomy

pub mod engine;
pub mod error;
pub mod parser;
pub mod sql;
pub mod tree;

pub use engine::{Command, Engine};
pub use error::{BoxError, BuildError, ExecError, ParseError, PolluteError, TransactionError};
pub use parser::{Format, JsonParser, Parser, YamlParser};
pub use sql::{Dialect, SqlBuilder, SqlCommand};
pub use tree::{Record, Tree, Value};
