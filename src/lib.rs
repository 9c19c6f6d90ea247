//! # outliner
//!
//! Heading classification engine for paginated documents.
//!
//! This library turns a flat stream of positioned, styled text fragments,
//! as produced by an external document parser, into a hierarchical
//! outline: a title plus an ordered sequence of H1/H2/H3 headings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use outliner::{outline_from_file, render, JsonFormat};
//!
//! fn main() -> outliner::Result<()> {
//!     // Classify a fragment dump produced by an external extractor
//!     let outline = outline_from_file("document.fragments.json")?;
//!
//!     let json = render::to_json(&outline, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Relative scoring**: weighted factors scored against each
//!   document's own typography, no absolute thresholds
//! - **Adaptive levels**: H1/H2/H3 bands from largest-gap clustering of
//!   the score distribution
//! - **Hierarchy repair**: illegal level jumps demoted, duplicates merged,
//!   reading order preserved
//! - **Page furniture removal**: repeating headers/footers never become
//!   headings
//! - **Resilient batches**: per-document timeout, bounded retry, circuit
//!   breaker, resource ceilings

pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod runtime;
pub mod source;

// Re-export commonly used types
pub use classify::{classify, classify_with_warnings, FontProfile, HeadingCandidate};
pub use config::{Config, FactorWeights};
pub use error::{Error, Result};
pub use model::{FragmentStream, Heading, HeadingLevel, Outline, TextFragment};
pub use render::JsonFormat;
pub use runtime::{
    BatchReport, BatchRunner, BatchSummary, DocumentResult, DocumentStatus, Engine,
};
pub use source::{FragmentSource, JsonSource, MemorySource, SourceRegistry};

use std::path::Path;

/// Classify a fragment stream with the default configuration.
///
/// # Example
///
/// ```
/// use outliner::{extract_outline, FragmentStream, TextFragment};
///
/// let fragments = vec![
///     TextFragment::new("Quarterly Review", 0, 72.0, 50.0, 24.0, "Helvetica-Bold", 0),
///     TextFragment::new(
///         "body text that sets the document baseline size for scoring",
///         0, 72.0, 120.0, 11.0, "Times", 1,
///     ),
/// ];
/// let outline = extract_outline(FragmentStream::new(fragments, 1));
/// assert_eq!(outline.title, "Quarterly Review");
/// ```
pub fn extract_outline(stream: FragmentStream) -> Outline {
    classify(&stream, &Config::default())
}

/// Classify a fragment stream with a custom configuration.
///
/// The configuration is validated first; invalid factor weights are
/// rejected rather than silently skewing scores.
pub fn extract_outline_with_config(stream: &FragmentStream, config: &Config) -> Result<Outline> {
    config.validate()?;
    Ok(classify(stream, config))
}

/// Read a JSON fragment dump and classify it with the default
/// configuration.
pub fn outline_from_file<P: AsRef<Path>>(path: P) -> Result<Outline> {
    let config = Config::default();
    let source = JsonSource::open(path.as_ref(), config.max_file_size_mb)?;
    let stream = source.fragments()?;
    Ok(classify(&stream, &config))
}

/// Builder for configuring and running the classification engine.
///
/// # Example
///
/// ```no_run
/// use outliner::Outliner;
/// use std::time::Duration;
///
/// let report = Outliner::new()
///     .with_max_headings(30)
///     .with_timeout(Duration::from_secs(60))
///     .batch()?
///     .run(&[]);
/// # Ok::<(), outliner::Error>(())
/// ```
pub struct Outliner {
    config: Config,
}

impl Outliner {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the factor weights.
    pub fn with_weights(mut self, weights: FactorWeights) -> Self {
        self.config = self.config.with_weights(weights);
        self
    }

    /// Set the maximum number of headings emitted per document.
    pub fn with_max_headings(mut self, max: usize) -> Self {
        self.config = self.config.with_max_headings(max);
        self
    }

    /// Set the per-document timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the batch worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config = self.config.with_workers(workers);
        self
    }

    /// Process documents one at a time on the current thread pool.
    pub fn engine(self) -> Result<Engine> {
        Engine::new(self.config)
    }

    /// Process documents over a bounded worker pool.
    pub fn batch(self) -> Result<BatchRunner> {
        BatchRunner::new(self.config)
    }

    /// Classify a single fragment stream directly.
    pub fn classify(self, stream: &FragmentStream) -> Result<Outline> {
        extract_outline_with_config(stream, &self.config)
    }
}

impl Default for Outliner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stream() -> FragmentStream {
        FragmentStream::new(
            vec![
                TextFragment::new("Document Title", 0, 72.0, 40.0, 26.0, "Helvetica-Bold", 0),
                TextFragment::new("1. Scope", 0, 72.0, 130.0, 16.0, "Helvetica-Bold", 1),
                TextFragment::new(
                    "a paragraph of ordinary running text that dominates the character count",
                    0,
                    72.0,
                    160.0,
                    11.0,
                    "Times",
                    2,
                ),
            ],
            1,
        )
    }

    #[test]
    fn test_extract_outline() {
        let outline = extract_outline(sample_stream());
        assert_eq!(outline.title, "Document Title");
        assert_eq!(outline.outline.len(), 1);
        assert_eq!(outline.outline[0].text, "1. Scope");
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let config = Config::default().with_weights(FactorWeights {
            size: 1.0,
            typography: 1.0,
            position: 0.0,
            pattern: 0.0,
            context: 0.0,
            length: 0.0,
        });
        let result = extract_outline_with_config(&sample_stream(), &config);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    // ==================== Builder Pattern Tests ====================

    #[test]
    fn test_outliner_builder_defaults() {
        let builder = Outliner::default();
        assert_eq!(builder.config.max_headings, 50);
    }

    #[test]
    fn test_outliner_builder_chained() {
        let builder = Outliner::new()
            .with_max_headings(10)
            .with_timeout(std::time::Duration::from_secs(5))
            .with_workers(2);

        assert_eq!(builder.config.max_headings, 10);
        assert_eq!(builder.config.timeout, std::time::Duration::from_secs(5));
        assert_eq!(builder.config.workers, 2);
    }

    #[test]
    fn test_outliner_classify() {
        let outline = Outliner::new().classify(&sample_stream()).unwrap();
        assert_eq!(outline.title, "Document Title");
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_outline_from_missing_file() {
        let result = outline_from_file("/nonexistent/fragments.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_stream_yields_empty_artifact() {
        let outline = extract_outline(FragmentStream::default());
        let json = render::to_json(&outline, JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":"","outline":[]}"#);
    }
}
