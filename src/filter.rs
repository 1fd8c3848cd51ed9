//! File-filter surface — the capability set the embedding application
//! programs against.
//!
//! Every storage format the application speaks exposes the same four
//! capabilities: declared extensions, whether one file can hold several
//! datasets, `read`, and `save`. This crate implements the set for the
//! project-archive format only.

use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use log::info;

use crate::array::ScientificArray;
use crate::error::ArchiveError;
use crate::magic::sniff;
use crate::sheet::decode_sheets;
use crate::writer::save_archive;

/// Template file expected next to the working directory when no explicit
/// path is configured.
pub const DEFAULT_TEMPLATE: &str = "template.cpj";

/// Capability set implemented once per storage format.
pub trait FileFilter {
    /// Human-readable format name (diagnostics only).
    fn name(&self) -> &'static str;
    /// File extensions this filter claims, without the leading dot.
    fn extensions(&self) -> &'static [&'static str];
    /// Whether one file can carry more than one dataset.
    fn multiple_datasets(&self) -> bool;
    fn read(&self, path: &Path) -> Result<Vec<ScientificArray>, ArchiveError>;
    fn save(&self, path: &Path, array: &ScientificArray, name: &str) -> Result<(), ArchiveError>;
}

/// The project-archive filter. Saving patches the configured template.
#[derive(Debug, Clone)]
pub struct ProjectArchiveFilter {
    template: PathBuf,
}

impl ProjectArchiveFilter {
    pub fn new<P: Into<PathBuf>>(template: P) -> Self {
        Self { template: template.into() }
    }

    pub fn template(&self) -> &Path {
        &self.template
    }
}

impl Default for ProjectArchiveFilter {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl FileFilter for ProjectArchiveFilter {
    fn name(&self) -> &'static str {
        "project archive"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["cpj"]
    }

    fn multiple_datasets(&self) -> bool {
        true
    }

    fn read(&self, path: &Path) -> Result<Vec<ScientificArray>, ArchiveError> {
        read_archive(path)
    }

    fn save(&self, path: &Path, array: &ScientificArray, name: &str) -> Result<(), ArchiveError> {
        let mut template = File::open(&self.template)
            .map_err(|e| ArchiveError::TemplateUnavailable(format!(
                "{}: {e}", self.template.display()
            )))?;
        // Created up front; dropping the handle closes it on every path.
        let mut out = File::create(path)?;
        save_archive(&mut template, &mut out, array, name)?;
        info!("saved dataset {name:?} ({} values) to {}", array.elements(), path.display());
        Ok(())
    }
}

/// Decode every recognisable dataset from an archive file.
///
/// Fails only when the stream is not recognisable as an archive at all (or
/// its very first header is malformed); sheets that fit no known array
/// shape are skipped, and a mid-stream failure after successful sheets
/// returns whatever was assembled.
pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<Vec<ScientificArray>, ArchiveError> {
    let bytes = std::fs::read(path.as_ref())?;
    let mut stream = Cursor::new(bytes);

    let token = sniff(&mut stream)?;
    info!("reading archive {} (format version {})", path.as_ref().display(), token.version);

    let sheets = decode_sheets(&mut stream)?;
    Ok(sheets.into_arrays())
}
