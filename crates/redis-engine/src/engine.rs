//! Sequential executor for Redis.

use crate::error::RedisEngineError;
use crate::set::{build_sets, SetCommand};
use async_trait::async_trait;
use polluter_core::{BuildError, Engine, ExecError, Tree};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

/// Redis engine: one `SET` per top-level key, no transaction.
#[derive(Clone)]
pub struct RedisEngine {
    connection: ConnectionManager,
}

impl RedisEngine {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    /// Open a managed connection to `redis_url`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let engine = RedisEngine::connect("redis://localhost:6379/0").await?;
    /// ```
    pub async fn connect(redis_url: &str) -> Result<Self, RedisEngineError> {
        let client = redis::Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self::new(connection))
    }

    pub fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

#[async_trait]
impl Engine for RedisEngine {
    type Command = SetCommand;

    fn build(&self, tree: Tree) -> Result<Vec<SetCommand>, BuildError> {
        build_sets(tree)
    }

    async fn exec(&self, commands: Vec<SetCommand>) -> Result<(), ExecError> {
        let mut conn = self.connection.clone();
        let total = commands.len();

        for (index, command) in commands.into_iter().enumerate() {
            debug!("Redis exec #{}: {}", index, command);
            let SetCommand { key, value } = command;
            let _: () = conn
                .set(&key, value)
                .await
                .map_err(|e| ExecError::command(index, key.as_str(), e))?;
        }

        info!("Set {} Redis keys", total);
        Ok(())
    }
}
