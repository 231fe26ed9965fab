//! CLI argument definitions for the PostgreSQL engine.

use clap::Args;

/// PostgreSQL-specific pollute arguments.
#[derive(Args, Clone, Debug)]
pub struct PostgreSQLPolluteArgs {
    /// PostgreSQL connection string (e.g., "host=localhost user=postgres password=postgres dbname=testdb")
    #[arg(long, env = "POSTGRESQL_CONNECTION_STRING")]
    pub postgresql_connection_string: String,
}
