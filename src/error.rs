use thiserror::Error;

use crate::schedule::PlanError;
use crate::storage::TableName;

/// Errors raised by the store, the planner and the command layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No row with this id exists in the table.
    #[error("{table} {id} not found")]
    NotFound { table: TableName, id: u64 },

    /// User input that could not be turned into a valid row.
    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
