//! Transactional executor for PostgreSQL.

use crate::dialect::PostgreSQLDialect;
use crate::error::PostgreSQLEngineError;
use crate::value::{to_sql_param, Param};
use async_trait::async_trait;
use polluter_core::{BoxError, BuildError, Engine, ExecError, SqlBuilder, SqlCommand, Tree};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Transaction};
use tracing::{debug, info, warn};

/// PostgreSQL engine: one INSERT per record, all in one transaction.
#[derive(Clone)]
pub struct PostgreSQLEngine {
    client: Arc<Mutex<Client>>,
    builder: SqlBuilder<PostgreSQLDialect>,
}

impl PostgreSQLEngine {
    /// Connect with a connection string and check the connection.
    ///
    /// The connection task is spawned onto the current tokio runtime.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let engine = PostgreSQLEngine::connect(
    ///     "host=localhost user=postgres password=postgres dbname=testdb",
    /// ).await?;
    /// ```
    pub async fn connect(connection_string: &str) -> Result<Self, PostgreSQLEngineError> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

        // Spawn the connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        // Test connection
        client.simple_query("SELECT 1").await?;

        Ok(Self::with_client(Arc::new(Mutex::new(client))))
    }

    /// Create an engine around an existing client.
    pub fn with_client(client: Arc<Mutex<Client>>) -> Self {
        Self {
            client,
            builder: SqlBuilder::new(PostgreSQLDialect),
        }
    }

    pub fn client(&self) -> &Arc<Mutex<Client>> {
        &self.client
    }
}

/// Prepare `command`, bind its arguments by parameter type and run it.
async fn execute(tx: &Transaction<'_>, command: &SqlCommand) -> Result<u64, BoxError> {
    let statement = tx.prepare(&command.statement).await?;

    let params: Vec<Param> = command
        .args
        .iter()
        .zip(statement.params())
        .map(|(value, ty)| to_sql_param(value, ty))
        .collect::<Result<_, _>>()?;

    // Convert to references for execution
    let param_refs: Vec<&(dyn ToSql + Sync)> = params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect();

    Ok(tx.execute(&statement, &param_refs).await?)
}

#[async_trait]
impl Engine for PostgreSQLEngine {
    type Command = SqlCommand;

    fn build(&self, tree: Tree) -> Result<Vec<SqlCommand>, BuildError> {
        self.builder.build(tree)
    }

    async fn exec(&self, commands: Vec<SqlCommand>) -> Result<(), ExecError> {
        let mut client = self.client.lock().await;
        let tx = client
            .transaction()
            .await
            .map_err(|e| ExecError::Begin(e.into()))?;

        let total = commands.len();
        for (index, command) in commands.into_iter().enumerate() {
            debug!("PostgreSQL exec #{}: {}", index, command);

            if let Err(e) = execute(&tx, &command).await {
                let failure = ExecError::command(index, command.target, e);
                warn!("Rolling back PostgreSQL transaction: {}", failure);
                return Err(match tx.rollback().await {
                    Ok(()) => failure,
                    Err(rollback) => failure.with_rollback_failure(rollback),
                });
            }
        }

        tx.commit().await.map_err(|e| ExecError::Commit(e.into()))?;
        info!("Committed {} PostgreSQL statements", total);
        Ok(())
    }
}
