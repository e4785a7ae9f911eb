//! Error types for SGRID resolution.

use thiserror::Error;

/// Errors that can occur while resolving a grid topology.
#[derive(Error, Debug)]
pub enum SgridError {
    /// No variable with `cf_role = grid_topology` was found.
    #[error("dataset is not SGRID compliant: no grid_topology variable found")]
    NonCompliant,

    /// The topology variable declares a dimension other than 2 or 3.
    #[error("topology dimension `{found}` is unsupported; expected 2 or 3")]
    UnsupportedTopologyDimension { found: String },

    /// Neither a `time` nor a `Times` variable exists in the dataset.
    #[error("dataset has no `time` or `Times` variable")]
    MissingTime,

    /// A padding-bearing attribute did not match the padding grammar.
    #[error("attribute `{attribute}` does not match the padding grammar: {reason}")]
    PaddingGrammar { attribute: String, reason: String },

    /// A variable named by the convention is absent from the dataset.
    #[error("variable `{0}` not found in dataset")]
    VariableNotFound(String),

    /// The underlying dataset store failed to produce data.
    #[error("failed to read from dataset: {0}")]
    Read(String),
}

impl SgridError {
    /// Create a Read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }
}

/// Result type for SGRID operations.
pub type Result<T> = std::result::Result<T, SgridError>;
