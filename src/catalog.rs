//! Discovery of report definition files.
//!
//! A [`Catalog`] parses every report file under a directory (or matching a glob pattern) and
//! indexes the definitions by report name.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ReportError, ReportResult};
use crate::rdl::ReportDescriptor;

/// Options for [`Catalog::load_dir`].
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// File extension of report definitions, without the dot.
    pub extension: String,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            extension: "rdl".to_string(),
            recursive: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    path: PathBuf,
    descriptor: ReportDescriptor,
}

/// Report definitions indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    reports: BTreeMap<String, Entry>,
}

impl Catalog {
    /// Load every file with the configured extension under `dir`.
    ///
    /// Files are visited in file-name order, so duplicate-name errors are deterministic.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Walk`] if the directory cannot be traversed
    /// - [`ReportError::Io`] if a file cannot be read
    /// - [`ReportError::Definition`] if a file does not parse
    /// - [`ReportError::DuplicateReport`] if two files declare the same report name
    pub fn load_dir(dir: impl AsRef<Path>, opts: &CatalogOptions) -> ReportResult<Self> {
        let extension = Some(OsStr::new(&opts.extension));
        let mut walker = WalkDir::new(dir.as_ref()).sort_by_file_name();
        if !opts.recursive {
            walker = walker.max_depth(1);
        }

        let mut catalog = Self::default();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && entry.path().extension() == extension {
                catalog.load_file(entry.path())?;
            }
        }
        Ok(catalog)
    }

    /// Load every file matching a glob pattern such as `reports/**/*.rdl`.
    ///
    /// A matched path that cannot be read fails the load with [`ReportError::GlobRead`].
    pub fn load_glob(pattern: &str) -> ReportResult<Self> {
        let mut catalog = Self::default();
        for path in glob::glob(pattern)? {
            let path = path?;
            if path.is_file() {
                catalog.load_file(&path)?;
            }
        }
        Ok(catalog)
    }

    /// Parse one report file and add it to the catalog.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ReportResult<&ReportDescriptor> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let descriptor: ReportDescriptor = text.parse().map_err(|source| ReportError::Definition {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(existing) = self.reports.get(&descriptor.name) {
            return Err(ReportError::DuplicateReport {
                name: descriptor.name,
                first: existing.path.clone(),
                second: path.to_path_buf(),
            });
        }

        let entry = self
            .reports
            .entry(descriptor.name.clone())
            .or_insert(Entry {
                path: path.to_path_buf(),
                descriptor,
            });
        Ok(&entry.descriptor)
    }

    /// Look up a report by name.
    pub fn get(&self, name: &str) -> Option<&ReportDescriptor> {
        self.reports.get(name).map(|e| &e.descriptor)
    }

    /// File the named report was loaded from.
    pub fn path(&self, name: &str) -> Option<&Path> {
        self.reports.get(name).map(|e| e.path.as_path())
    }

    /// Reports in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportDescriptor)> {
        self.reports
            .iter()
            .map(|(name, e)| (name.as_str(), &e.descriptor))
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
