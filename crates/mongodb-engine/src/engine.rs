//! Sequential executor for MongoDB.

use crate::error::MongoDBEngineError;
use crate::insert::{build_documents, DocumentCommand};
use async_trait::async_trait;
use bson::Document;
use mongodb::{Client, Database};
use polluter_core::{BuildError, Engine, ExecError, Tree};
use tracing::{debug, info};

/// MongoDB engine: one `insertMany` per collection, no transaction.
#[derive(Clone, Debug)]
pub struct MongoDBEngine {
    database: Database,
}

impl MongoDBEngine {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect to `database_name` and check the connection.
    pub async fn connect(
        connection_string: &str,
        database_name: &str,
    ) -> Result<Self, MongoDBEngineError> {
        let client = Client::with_uri_str(connection_string).await?;
        let database = client.database(database_name);

        // Test connection
        database.list_collection_names().await?;

        Ok(Self::new(database))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[async_trait]
impl Engine for MongoDBEngine {
    type Command = DocumentCommand;

    fn build(&self, tree: Tree) -> Result<Vec<DocumentCommand>, BuildError> {
        build_documents(tree)
    }

    async fn exec(&self, commands: Vec<DocumentCommand>) -> Result<(), ExecError> {
        let mut inserted = 0;

        for (index, command) in commands.into_iter().enumerate() {
            let DocumentCommand {
                collection,
                documents,
            } = command;

            // insertMany rejects an empty batch.
            if documents.is_empty() {
                debug!("MongoDB exec #{}: nothing to insert into {}", index, collection);
                continue;
            }

            debug!(
                "MongoDB exec #{}: insertMany {} ({} documents)",
                index,
                collection,
                documents.len()
            );
            let result = self
                .database
                .collection::<Document>(&collection)
                .insert_many(documents)
                .await
                .map_err(|e| ExecError::command(index, collection.as_str(), e))?;
            inserted += result.inserted_ids.len();
        }

        info!("Inserted {} MongoDB documents", inserted);
        Ok(())
    }
}
