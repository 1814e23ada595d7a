use super::config::ConfigError;
use crate::charmm::patch::PatchError;
use crate::core::io::crd::CrdError;
use crate::core::io::pdb::PdbError;
use crate::drivers::process::DriverError;
use crate::segments::classifier::ClassificationError;
use crate::segments::export::ExportError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Unknown ligand (file) name error with name: '{0}'")]
    InvalidLigandName(String),

    #[error("Unsupported structure file extension '{0}' (expected pdb or crd)")]
    UnsupportedFormat(String),

    #[error("Failed to read structure '{path}': {source}")]
    Pdb {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Failed to read structure '{path}': {source}")]
    Crd {
        path: PathBuf,
        #[source]
        source: CrdError,
    },

    #[error("Segment classification failed: {source}")]
    Classification {
        #[from]
        source: ClassificationError,
    },

    #[error("CRD export failed: {source}")]
    Export {
        #[from]
        source: ExportError,
    },

    #[error("Failed to write atom table '{path}': {source}")]
    AtomTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("External tool failed: {source}")]
    Driver {
        #[from]
        source: DriverError,
    },

    #[error("Stream/log file not found: {0}")]
    TopparNotFound(PathBuf),

    #[error("Template patching failed: {source}")]
    Patch {
        #[from]
        source: PatchError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrepareError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| PrepareError::Io { path, source }
    }
}
