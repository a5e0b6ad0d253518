//! Model and store error types

use std::path::PathBuf;

use thiserror::Error;

use crate::layer::{LayerId, ScenarioId};

/// Errors from layer stack operations
///
/// These are all "stale reference" style failures: callers holding ids from
/// the selection or a list UI treat them as no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Layer {0} not found")]
    LayerNotFound(LayerId),

    #[error("Layer {0} already exists in this scenario")]
    DuplicateLayer(LayerId),

    #[error("Index {index} out of range for {len} layers")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors from the object store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Scenario {0} not found")]
    ScenarioNotFound(ScenarioId),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed to access snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
