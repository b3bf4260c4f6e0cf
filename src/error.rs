//! Error types for the heap engine and the Huffman builder

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected before anything was mutated
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The arena already holds as many live nodes as it is allowed to
    #[error("node limit of {limit} reached")]
    NodeLimit { limit: usize },

    /// Backing storage could not grow
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("heap is empty")]
    EmptyHeap,

    #[error("merge needs at least two queued nodes, found {0}")]
    NotEnoughNodes(usize),

    #[error("{0} nodes left unmerged in the queue")]
    Unmerged(usize),

    /// A level-order position that should exist could not be reached
    #[error("no node at level-order position {0}")]
    MissingPosition(usize),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// True for the failures that stand for running out of storage.
    pub fn is_allocation(&self) -> bool {
        matches!(self, Error::NodeLimit { .. } | Error::Allocation(_))
    }
}
