//! Error taxonomy for graph partitioning: invalid input, I/O failure, and
//! malformed graph files.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed graph file: {0}")]
    Format(String),
}
