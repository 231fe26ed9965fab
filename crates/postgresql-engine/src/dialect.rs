//! PostgreSQL flavour of the relational builder: double-quoted identifiers,
//! numbered `$n` placeholders.

use polluter_core::sql::{quote_with, Dialect};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgreSQLDialect;

impl Dialect for PostgreSQLDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn quote(&self, ident: &str) -> String {
        quote_with(ident, '"')
    }

    fn placeholder(&self, position: usize) -> String {
        format!("${position}")
    }

    fn empty_insert(&self, table: &str) -> String {
        format!("INSERT INTO {} DEFAULT VALUES;", self.quote(table))
    }
}
