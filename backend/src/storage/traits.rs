//! # Storage Traits
//!
//! Artifact writers used by the export pipeline. The domain layer only sees
//! these traits, so output formats can be swapped without touching the
//! export orchestration.

use std::fs;
use std::path::Path;

use crate::domain::models::report::Report;
use crate::error::Result;

/// A rendered document held in memory until it is saved
///
/// Owned by a single export call. Saving consumes it, so the buffer is
/// released as soon as it reaches disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the document to `path`, returning the number of bytes written
    pub fn save(self, path: &Path) -> Result<usize> {
        fs::write(path, &self.bytes)?;
        Ok(self.bytes.len())
    }
}

/// Trait defining the interface for single-page report documents
pub trait DocumentRenderer: Send + Sync {
    /// File extension of the rendered document, without the dot
    fn extension(&self) -> &'static str;

    /// Lay out the whole report on one page
    fn render(&self, report: &Report) -> Result<RenderedDocument>;
}

/// Trait defining the interface for row-oriented spreadsheets
pub trait SpreadsheetWriter: Send + Sync {
    fn extension(&self) -> &'static str;

    /// Write metadata, table and summary rows to `path`
    fn write(&self, report: &Report, path: &Path) -> Result<()>;
}
