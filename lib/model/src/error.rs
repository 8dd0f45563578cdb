use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

/// A result whose error is an [OlapError].
pub type OlapResult<T> = Result<T, OlapError>;

/// An error raised while translating or executing a multidimensional query.
///
/// All variants except [OlapError::Engine] describe the shape of the query (or of the metadata)
/// and are not retried. The error is cheap to clone so that a failed metadata population can be
/// reported to every thread that waited for it.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum OlapError {
    /// An identifier did not match any schema object of the cube.
    #[error("Unable to resolve the identifier {0}")]
    UnresolvedIdentifier(String),
    /// A function, operator or parse tree node outside the supported subset of MDX.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// A `Cast` whose target type is not `NUMERIC`.
    #[error("Cannot cast to {0}, only NUMERIC is supported")]
    UnsupportedCast(String),
    /// A literal that is neither numeric nor a string.
    #[error("Unsupported literal type: {0}")]
    UnsupportedLiteralType(String),
    /// The query requests more non-filter axes than supported.
    #[error("Only two axes are supported, but the query has {0}")]
    UnsupportedAxisCount(usize),
    /// A set contains an element that is neither a member nor a tuple of members.
    #[error("Malformed tuple: {0}")]
    MalformedTuple(String),
    /// A cell is addressed by more than one measure.
    #[error("A cell can only be addressed by a single measure, found {0}")]
    MultipleMeasuresUnsupported(String),
    /// The query uses no measure and the cube does not declare any.
    #[error("The cube {0} does not declare any measure")]
    NoMeasureAvailable(String),
    /// An ordinal or coordinate outside the cell grid.
    #[error("Index {index} is out of bounds (size {size})")]
    IndexOutOfBounds { index: usize, size: usize },
    /// The positions of an axis do not share the same hierarchies and levels.
    #[error("All positions of axis {axis} must use the same hierarchies and levels: {reason}")]
    HeterogeneousAxis { axis: String, reason: String },
    /// A metadata row returned by the backend is missing data.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
    /// A result row returned by the backend does not match the plan.
    #[error("Malformed query result: {0}")]
    MalformedResult(String),
    /// An error from the Linked Data Engine.
    #[error("Error from the Linked Data Engine: {0}")]
    Engine(#[source] Arc<dyn Error + Send + Sync + 'static>),
}

impl OlapError {
    /// Wraps an arbitrary backend error.
    pub fn engine(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Engine(Arc::from(error.into()))
    }

    /// Creates a result with an [OlapError::UnsupportedOperation].
    pub fn unsupported<T>(operation: impl Into<String>) -> OlapResult<T> {
        Err(Self::UnsupportedOperation(operation.into()))
    }

    /// Creates a result with an [OlapError::InvalidMetadata].
    pub fn invalid_metadata<T>(cause: impl Into<String>) -> OlapResult<T> {
        Err(Self::InvalidMetadata(cause.into()))
    }
}
