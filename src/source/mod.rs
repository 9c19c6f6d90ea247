//! Fragment sources: the boundary to the external document parser.
//!
//! The engine never parses document bytes itself; it consumes a finite
//! ordered fragment sequence from a [`FragmentSource`]. Implement the trait
//! to plug in a real extractor; [`JsonSource`] reads the serialized dump
//! format such an extractor would emit.
//!
//! # Example
//!
//! ```no_run
//! use outliner::source::{FragmentSource, SourceRegistry};
//! use std::path::Path;
//!
//! fn main() -> outliner::Result<()> {
//!     let registry = SourceRegistry::with_defaults();
//!     let source = registry.open(Path::new("document.fragments.json"), 100)?;
//!     let stream = source.fragments()?;
//!     println!("{} fragments", stream.len());
//!     Ok(())
//! }
//! ```

mod json;

pub use json::JsonSource;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::FragmentStream;

/// A provider of positioned text fragments for one document.
///
/// `fragments` may fail with [`Error::Parse`] for corrupt or unsupported
/// input; the resilience wrapper retries transient failures and converts
/// persistent ones into a skipped-document result.
pub trait FragmentSource: Send + Sync {
    /// Name of this source (for logs and result records).
    fn name(&self) -> &str;

    /// Produce the document's fragment stream.
    fn fragments(&self) -> Result<FragmentStream>;
}

/// Factory for opening a [`FragmentSource`] from a file path.
pub trait SourceOpener: Send + Sync {
    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Open a source for the given path, enforcing the size ceiling.
    fn open(&self, path: &Path, max_file_size_mb: u32) -> Result<Box<dyn FragmentSource>>;
}

/// Registry mapping file extensions to source openers.
pub struct SourceRegistry {
    openers: HashMap<String, Arc<dyn SourceOpener>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            openers: HashMap::new(),
        }
    }

    /// Create a registry with the default JSON dump opener.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(json::JsonOpener));
        registry
    }

    /// Register an opener for all its supported extensions.
    pub fn register(&mut self, opener: Arc<dyn SourceOpener>) {
        for ext in opener.supported_extensions() {
            self.openers.insert(ext.to_lowercase(), opener.clone());
        }
    }

    /// Check whether an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.openers.contains_key(&ext.to_lowercase())
    }

    /// Open a source for a path using its extension.
    pub fn open(&self, path: &Path, max_file_size_mb: u32) -> Result<Box<dyn FragmentSource>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::Parse("file has no extension".into()))?;

        let opener = self
            .openers
            .get(&ext.to_lowercase())
            .ok_or_else(|| Error::Parse(format!("no source for extension: {ext}")))?;

        opener.open(path, max_file_size_mb)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// An in-memory source, useful for embedding and tests.
pub struct MemorySource {
    name: String,
    stream: FragmentStream,
}

impl MemorySource {
    /// Wrap a fragment stream as a source.
    pub fn new(name: impl Into<String>, stream: FragmentStream) -> Self {
        Self {
            name: name.into(),
            stream,
        }
    }
}

impl FragmentSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fragments(&self) -> Result<FragmentStream> {
        Ok(self.stream.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextFragment;

    #[test]
    fn test_registry_defaults() {
        let registry = SourceRegistry::with_defaults();
        assert!(registry.supports("json"));
        assert!(registry.supports("JSON"));
        assert!(!registry.supports("pdf"));
    }

    #[test]
    fn test_registry_rejects_unknown_extension() {
        let registry = SourceRegistry::with_defaults();
        let result = registry.open(Path::new("input.xyz"), 100);
        assert!(matches!(result, Err(Error::Parse(_))));

        let result = registry.open(Path::new("noextension"), 100);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_memory_source() {
        let stream = FragmentStream::new(
            vec![TextFragment::new("Hi", 0, 0.0, 0.0, 12.0, "T", 0)],
            1,
        );
        let source = MemorySource::new("mem", stream);
        assert_eq!(source.name(), "mem");
        assert_eq!(source.fragments().unwrap().len(), 1);
    }
}
