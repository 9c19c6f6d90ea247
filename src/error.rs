//! Error types for the outliner library.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for outliner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while producing a document outline.
///
/// The classification stages themselves are total: given any well-formed
/// fragment sequence they always produce an [`Outline`](crate::Outline).
/// Every variant here originates at the boundaries: input acquisition,
/// configuration, resource policy, or output serialization.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document contains no extractable text.
    ///
    /// Not fatal: callers emit an empty outline instead of aborting the
    /// batch.
    #[error("Document has no extractable text")]
    EmptyDocument,

    /// The external fragment parser failed on corrupt or unsupported input.
    #[error("Fragment parse error: {0}")]
    Parse(String),

    /// The input exceeds the configured size ceiling and was skipped
    /// without any processing attempt.
    #[error("Input too large: {size_mb:.1}MB exceeds the {limit_mb}MB limit")]
    OversizeInput {
        /// Observed input size in megabytes.
        size_mb: f64,
        /// Configured ceiling in megabytes.
        limit_mb: u32,
    },

    /// The per-document deadline elapsed before the pipeline finished.
    #[error("Processing timed out after {0:?}")]
    Timeout(Duration),

    /// The batch circuit breaker is open; remaining documents are skipped
    /// without attempt.
    #[error("Circuit breaker is open; document skipped")]
    CircuitOpen,

    /// Configuration failed validation at load time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error serializing the output artifact.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether a retry of the failing operation could plausibly succeed.
    ///
    /// Only external parser failures are transient; everything else is
    /// deterministic and retrying would waste the attempt budget.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::Io(_))
    }
}
