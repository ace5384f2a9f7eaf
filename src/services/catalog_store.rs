use crate::models::{AttributeGroups, CatalogSettings, ParsedCatalog};
use crate::services::{catalog_builder, catalog_parser};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use thiserror::Error;

/// Errors raised while persisting or rereading the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to create catalog directory {path}: {source}")]
    CreateDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Location of the catalog file and its secondary index.
///
/// Both files are fully overwritten on every write; nothing is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStore {
    catalog_path: Utf8PathBuf,
    index_path: Utf8PathBuf,
}

impl CatalogStore {
    pub fn new(catalog_path: impl Into<Utf8PathBuf>, index_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            index_path: index_path.into(),
        }
    }

    pub fn from_settings(settings: &CatalogSettings) -> Self {
        Self::new(settings.catalog_path(), settings.index_path())
    }

    pub fn catalog_path(&self) -> &Utf8Path {
        &self.catalog_path
    }

    pub fn index_path(&self) -> &Utf8Path {
        &self.index_path
    }

    /// Overwrite the catalog file with `groups`.
    pub fn write_catalog(&self, groups: &AttributeGroups) -> Result<(), CatalogError> {
        let file = create_file(&self.catalog_path)?;
        catalog_builder::write_catalog(groups, BufWriter::new(file)).map_err(|source| {
            CatalogError::Write {
                path: self.catalog_path.clone(),
                source,
            }
        })?;

        tracing::info!(
            "Wrote catalog {} ({} groups, {} attributes)",
            self.catalog_path,
            groups.len(),
            groups.pair_count()
        );
        Ok(())
    }

    /// Reread the catalog file from disk.
    pub fn read_catalog(&self) -> Result<ParsedCatalog, CatalogError> {
        let read_error = |source| CatalogError::Read {
            path: self.catalog_path.clone(),
            source,
        };

        let file = File::open(&self.catalog_path).map_err(read_error)?;
        catalog_parser::parse_catalog(BufReader::new(file)).map_err(read_error)
    }

    /// Overwrite the secondary index file.
    pub fn write_index(&self, parsed: &ParsedCatalog) -> Result<(), CatalogError> {
        let file = create_file(&self.index_path)?;
        catalog_parser::write_index(parsed, BufWriter::new(file)).map_err(|source| {
            CatalogError::Write {
                path: self.index_path.clone(),
                source,
            }
        })?;

        tracing::debug!("Wrote catalog index {}", self.index_path);
        Ok(())
    }
}

fn create_file(path: &Utf8Path) -> Result<File, CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| CatalogError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    File::create(path).map_err(|source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    })
}
