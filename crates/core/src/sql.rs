//! Relational command builder shared by the SQL dialects.
//!
//! Every record of every top-level record sequence becomes one
//! `INSERT INTO <table> (<columns>) VALUES (<placeholders>);` statement.
//! Columns follow field order and there is exactly one placeholder per
//! argument.

use crate::engine::Command;
use crate::error::BuildError;
use crate::tree::{Record, Tree, Value};
use serde_json::Value as JsonValue;
use std::fmt;
use tracing::debug;

/// Identifier quoting and placeholder style of a SQL dialect.
pub trait Dialect: Send + Sync {
    /// Dialect name used in logs.
    fn name(&self) -> &'static str;

    /// Quote a table or column name.
    fn quote(&self, ident: &str) -> String;

    /// Placeholder for the argument at `position` (1-based).
    fn placeholder(&self, position: usize) -> String;

    /// Statement for a record without fields.
    fn empty_insert(&self, table: &str) -> String {
        format!("INSERT INTO {} () VALUES ();", self.quote(table))
    }
}

/// Quote `ident` with `quote`, doubling any embedded quote character.
pub fn quote_with(ident: &str, quote: char) -> String {
    let mut quoted = String::with_capacity(ident.len() + 2);
    quoted.push(quote);
    for c in ident.chars() {
        if c == quote {
            quoted.push(quote);
        }
        quoted.push(c);
    }
    quoted.push(quote);
    quoted
}

/// One parameterized INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCommand {
    pub target: String,
    pub statement: String,
    /// One argument per placeholder, in placeholder order.
    pub args: Vec<JsonValue>,
}

impl Command for SqlCommand {
    fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for SqlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement)
    }
}

/// Builds one [`SqlCommand`] per record.
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder<D> {
    dialect: D,
}

impl<D: Dialect> SqlBuilder<D> {
    pub fn new(dialect: D) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn build(&self, tree: Tree) -> Result<Vec<SqlCommand>, BuildError> {
        let mut commands = Vec::new();

        tree.walk(|table, value| {
            let records = match value {
                Value::RecordSequence(records) => records,
                other => {
                    return Err(BuildError::NotRecordSequence {
                        name: table,
                        found: other.kind(),
                    })
                }
            };
            for record in records {
                commands.push(self.insert(&table, record)?);
            }
            Ok(())
        })?;

        debug!(
            "Built {} {} INSERT statements",
            commands.len(),
            self.dialect.name()
        );
        Ok(commands)
    }

    fn insert(&self, table: &str, record: Record) -> Result<SqlCommand, BuildError> {
        if record.is_empty() {
            return Ok(SqlCommand {
                target: table.to_string(),
                statement: self.dialect.empty_insert(table),
                args: Vec::new(),
            });
        }

        let mut statement = format!("INSERT INTO {} (", self.dialect.quote(table));
        let mut placeholders = String::from("(");
        let mut args = Vec::with_capacity(record.len());

        record.walk(|field, value| {
            if !args.is_empty() {
                statement.push_str(", ");
                placeholders.push_str(", ");
            }
            // Nested records and record sequences travel as JSON values.
            args.push(JsonValue::from(value));
            statement.push_str(&self.dialect.quote(&field));
            placeholders.push_str(&self.dialect.placeholder(args.len()));
            Ok::<_, BuildError>(())
        })?;

        statement.push_str(") VALUES ");
        statement.push_str(&placeholders);
        statement.push_str(");");

        Ok(SqlCommand {
            target: table.to_string(),
            statement,
            args,
        })
    }
}
