//! Fixture keys to Redis `SET` commands.

use polluter_core::{BuildError, Command, Tree};
use std::fmt;
use tracing::debug;

/// `SET key value` without expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCommand {
    pub key: String,
    pub value: Vec<u8>,
}

impl Command for SetCommand {
    fn target(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for SetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SET {} = {:?}",
            self.key,
            String::from_utf8_lossy(&self.value)
        )
    }
}

/// One [`SetCommand`] per top-level key, holding the compact JSON of its value.
pub fn build_sets(tree: Tree) -> Result<Vec<SetCommand>, BuildError> {
    let mut commands = Vec::with_capacity(tree.len());

    tree.walk(|key, value| {
        let value = serde_json::to_vec(&value).map_err(|source| BuildError::Encode {
            name: key.clone(),
            source,
        })?;
        commands.push(SetCommand { key, value });
        Ok(())
    })?;

    debug!("Built {} Redis SET commands", commands.len());
    Ok(commands)
}
