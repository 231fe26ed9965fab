//! MySQL flavour of the relational builder: backtick identifiers, `?` placeholders.

use polluter_core::sql::{quote_with, Dialect};

#[derive(Debug, Clone, Copy, Default)]
pub struct MySQLDialect;

impl Dialect for MySQLDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self, ident: &str) -> String {
        quote_with(ident, '`')
    }

    fn placeholder(&self, _position: usize) -> String {
        "?".to_string()
    }
}
