use thiserror::Error;

/// Errors that can occur while setting up the Redis engine.
#[derive(Error, Debug)]
pub enum RedisEngineError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
