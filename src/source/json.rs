//! JSON fragment-dump source.
//!
//! Reads the serialized form of a [`FragmentStream`] as emitted by an
//! external byte-level extractor:
//!
//! ```json
//! {
//!   "page_count": 12,
//!   "fragments": [
//!     { "text": "1. Introduction", "page": 0, "x": 72.0, "y": 140.0,
//!       "font_size": 18.0, "font_family": "Helvetica-Bold",
//!       "bold": true, "index": 1 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::FragmentStream;

use super::{FragmentSource, SourceOpener};

/// A fragment source backed by a JSON dump file.
pub struct JsonSource {
    path: PathBuf,
    name: String,
}

impl JsonSource {
    /// Open a dump file, enforcing the size ceiling before any read.
    pub fn open(path: impl Into<PathBuf>, max_file_size_mb: u32) -> Result<Self> {
        let path = path.into();

        let len = fs::metadata(&path)?.len();
        let size_mb = len as f64 / (1024.0 * 1024.0);
        if size_mb > max_file_size_mb as f64 {
            return Err(Error::OversizeInput {
                size_mb,
                limit_mb: max_file_size_mb,
            });
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self { path, name })
    }
}

impl FragmentSource for JsonSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fragments(&self) -> Result<FragmentStream> {
        let data = fs::read(&self.path)?;
        let stream: FragmentStream = serde_json::from_slice(&data)
            .map_err(|e| Error::Parse(format!("{}: {e}", self.path.display())))?;

        if stream.page_count == 0 && !stream.is_empty() {
            return Err(Error::Parse(format!(
                "{}: fragments present but page_count is 0",
                self.path.display()
            )));
        }

        log::debug!(
            "Loaded {} fragments over {} pages from {}",
            stream.len(),
            stream.page_count,
            self.path.display()
        );

        Ok(stream)
    }
}

/// Opener registering `*.json` dump files.
pub struct JsonOpener;

impl SourceOpener for JsonOpener {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn open(&self, path: &Path, max_file_size_mb: u32) -> Result<Box<dyn FragmentSource>> {
        Ok(Box::new(JsonSource::open(path, max_file_size_mb)?))
    }
}
