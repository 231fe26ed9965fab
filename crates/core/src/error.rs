//! Error taxonomy shared by every backend.
//!
//! Each stage of the pipeline has its own error type; [`PolluteError`] tags
//! a stage failure with the name of the stage.

use thiserror::Error;

/// Boxed driver error carried through the executors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The input stream could not be turned into a [`Tree`](crate::Tree).
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document root must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// `.nan`, `.inf` and `-.inf` have no JSON counterpart.
    #[error("non-finite number at `{path}`")]
    NonFiniteNumber { path: String },

    #[error("mapping key at `{path}` must be a string, number or boolean")]
    UnsupportedKey { path: String },
}

/// The tree does not have the shape a builder requires.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("`{name}` must be a sequence of records, found {found}")]
    NotRecordSequence { name: String, found: &'static str },

    #[error("failed to encode `{name}`: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode `{name}`: {reason}")]
    Decode { name: String, reason: String },
}

/// A rollback that failed after a command had already failed.
#[derive(Error, Debug)]
#[error("rollback failed: {0}")]
pub struct TransactionError(#[source] pub BoxError);

/// The backend rejected a command, or the transaction around it.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("tx begin: {0}")]
    Begin(#[source] BoxError),

    /// `index` is the zero-based position of the command in emission order.
    #[error("command #{index} on `{target}` failed: {source}")]
    Command {
        index: usize,
        target: String,
        #[source]
        source: BoxError,
    },

    /// A command failed and the rollback issued for it failed too.
    #[error("{failure} ({rollback})")]
    Rollback {
        #[source]
        failure: Box<ExecError>,
        rollback: TransactionError,
    },

    #[error("commit: {0}")]
    Commit(#[source] BoxError),
}

impl ExecError {
    pub fn command(index: usize, target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ExecError::Command {
            index,
            target: target.into(),
            source: source.into(),
        }
    }

    /// Chain a failed rollback onto this error.
    pub fn with_rollback_failure(self, rollback: impl Into<BoxError>) -> Self {
        ExecError::Rollback {
            failure: Box::new(self),
            rollback: TransactionError(rollback.into()),
        }
    }

    /// The rollback failure, if one was chained onto this error.
    pub fn rollback_failure(&self) -> Option<&TransactionError> {
        match self {
            ExecError::Rollback { rollback, .. } => Some(rollback),
            _ => None,
        }
    }
}

/// Failure of a whole pollute run, tagged with the stage that failed.
#[derive(Error, Debug)]
pub enum PolluteError {
    #[error("parse failed: {0}")]
    Parse(#[source] ParseError),

    #[error("build commands failed: {0}")]
    Build(#[source] BuildError),

    #[error("exec failed: {0}")]
    Exec(#[source] ExecError),
}

impl PolluteError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PolluteError::Parse(_) => "parse",
            PolluteError::Build(_) => "build",
            PolluteError::Exec(_) => "exec",
        }
    }
}
