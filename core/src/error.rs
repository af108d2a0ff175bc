use std::fmt;

use thiserror::Error;

use crate::storage::VertexId;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Which end of a path query an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => f.write_str("starting"),
            Endpoint::Target => f.write_str("ending"),
        }
    }
}

/// Errors raised while reading a component or computing a path.
#[derive(Error, Debug)]
pub enum Error {
    /// Source or target is not one of the component's vertices.
    #[error("the {endpoint} vertex {id} is not in the component")]
    VertexNotFound { endpoint: Endpoint, id: VertexId },

    /// Target is unreachable from the source.
    #[error("no path exists from vertex {source_id} to vertex {target_id}")]
    NoPathExists { source_id: VertexId, target_id: VertexId },

    /// A safety cap tripped; the working state is inconsistent.
    #[error("{stage} exceeded its iteration limit of {limit}")]
    IterationLimitExceeded { stage: &'static str, limit: usize },

    /// A predecessor chain ended somewhere other than the source.
    #[error("predecessor chain ends at vertex {at}, not at the source")]
    BrokenPredecessorChain { at: VertexId },

    #[error("edge schema has no integer attribute to use as a weight")]
    NoWeightAttribute,

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("weight attribute '{0}' is not an integer attribute")]
    WeightAttributeNotInteger(String),

    #[error("edge {start} -> {end} has negative weight {weight}")]
    NegativeWeight {
        start: VertexId,
        end: VertexId,
        weight: i32,
    },

    #[error("vertex {0} appears more than once in the vertex file")]
    DuplicateVertex(VertexId),

    #[error("component has {vertices} vertices, configured limit is {limit}")]
    TooManyVertices { vertices: usize, limit: usize },

    /// The n×n weight matrix cannot be sized or allocated.
    #[error("weight matrix for {vertices} vertices does not fit in memory")]
    MatrixTooLarge { vertices: usize },

    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    #[error("component manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Error::CorruptRecord(msg.into())
    }

    /// True for errors that describe the caller's query rather than the
    /// component's contents.
    pub fn is_query_error(&self) -> bool {
        matches!(self, Error::VertexNotFound { .. } | Error::NoPathExists { .. })
    }
}
