use thiserror::Error;
use tracing::{debug, error};

use crate::engine::schema::SchemaError;

/// Errors that abort a whole rollup batch. No output may be published when
/// one of these is returned.
#[derive(Debug, Error)]
pub enum RollupError {
    #[error("Schema violation: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Worker pool failed to start: {0}")]
    WorkerPool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RollupError {
    pub fn log_error(&self) {
        match self {
            RollupError::Schema(e) => {
                error!("Schema violation, aborting batch: {}", e);
                debug!("Schema violation details: {:?}", e);
            }
            RollupError::Config(e) => {
                error!("Invalid configuration: {}", e);
            }
            RollupError::WorkerPool(e) => {
                error!("Worker pool failed to start: {}", e);
            }
            RollupError::Io(e) => {
                error!("I/O error: {}", e);
                debug!("I/O error details: {:?}", e);
            }
            RollupError::Json(e) => {
                error!("JSON error: {}", e);
                debug!("JSON error details: {:?}", e);
            }
        }
    }
}

/// Reasons a single input row is dropped from the batch. These never abort
/// the run; they are counted and logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowRejection {
    #[error("row is not a JSON object")]
    NotAnObject,

    #[error("client_id is null or empty")]
    MissingClientId,

    #[error("subsession_start_date is null")]
    MissingStartDate,

    #[error("unparseable timestamp in '{column}': {value}")]
    InvalidTimestamp { column: String, value: String },
}

/// Outcome of decoding one raw row that did not yield a ping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("row dropped: {0}")]
    Rejected(#[from] RowRejection),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
