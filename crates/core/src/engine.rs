//! The builder/executor contract every backend implements.

use crate::error::{BuildError, ExecError};
use crate::tree::Tree;
use async_trait::async_trait;
use std::fmt;

/// A backend specific operation produced by [`Engine::build`].
///
/// `Display` renders the operation for logs and dry runs.
pub trait Command: fmt::Debug + fmt::Display + Send + Sync {
    /// Table, collection or key the command writes to.
    fn target(&self) -> &str;
}

/// A database backend: translates a [`Tree`] into commands and applies them.
///
/// Commands are applied in the order `build` emitted them. Atomicity is a
/// property of the backend: relational engines run all commands in one
/// transaction, the others apply them one by one and stop at the first
/// failure.
#[async_trait]
pub trait Engine: Send + Sync {
    type Command: Command;

    fn build(&self, tree: Tree) -> Result<Vec<Self::Command>, BuildError>;

    async fn exec(&self, commands: Vec<Self::Command>) -> Result<(), ExecError>;
}
