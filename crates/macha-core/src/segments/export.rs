use super::classifier::Segmentation;
use super::names::{is_hetero_label, is_solvent_or_ions};
use crate::core::io::crd::{CrdError, CrdFile};
use crate::core::models::structure::Structure;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// One of the two simulation legs prepared for every ligand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Protein-ligand complex.
    Complex,
    /// Ligand alone in a water box.
    Waterbox,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Complex, Target::Waterbox];

    /// Name of the target's subfolder below the ligand directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Target::Complex => "complex",
            Target::Waterbox => "waterbox",
        }
    }

    /// Whether a segment with this label is simulated in this target.
    pub fn includes(self, label: &str) -> bool {
        match self {
            Target::Complex => !is_solvent_or_ions(label),
            Target::Waterbox => is_hetero_label(label),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write segment {label} to '{path}': {source}")]
    Write {
        label: String,
        path: PathBuf,
        #[source]
        source: CrdError,
    },
}

/// Files produced by [`export_segments`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Labels that were written, in segmentation order.
    pub labels: Vec<String>,
    /// Every file written, complex files first.
    pub written: Vec<PathBuf>,
}

fn crd_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{}.crd", label.to_lowercase()))
}

fn ensure_dir(path: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(path).map_err(|e| ExportError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_segment(
    structure: &Structure,
    segmentation: &Segmentation,
    label: &str,
    path: PathBuf,
) -> Result<PathBuf, ExportError> {
    let atoms = segmentation
        .segment(label)
        .map(|s| s.atoms.as_slice())
        .unwrap_or_default();
    CrdFile::write_atoms_to_path(structure, atoms, label, &path).map_err(|e| {
        ExportError::Write {
            label: label.to_string(),
            path: path.clone(),
            source: e,
        }
    })?;
    debug!("Wrote {} atoms of {} to {}", atoms.len(), label, path.display());
    Ok(path)
}

/// Writes one CRD file per segment into the ligand's simulation folders.
///
/// Every segment except `SOLV` and `IONS` goes to `complex/{label}.crd`;
/// heteroatom segments are additionally written to `waterbox/{label}.crd`.
/// File names are lower-cased labels. Existing files are overwritten.
pub fn export_segments(
    structure: &Structure,
    segmentation: &Segmentation,
    ligand_dir: &Path,
) -> Result<ExportSummary, ExportError> {
    let complex_dir = ligand_dir.join(Target::Complex.dir_name());
    let waterbox_dir = ligand_dir.join(Target::Waterbox.dir_name());
    ensure_dir(&complex_dir)?;
    ensure_dir(&waterbox_dir)?;

    let mut summary = ExportSummary::default();
    let mut waterbox_files = Vec::new();

    for label in segmentation.labels() {
        if !Target::Complex.includes(label) {
            debug!("Skipping segment {} (solvent/ions)", label);
            continue;
        }
        summary.labels.push(label.to_string());
        let path = write_segment(structure, segmentation, label, crd_path(&complex_dir, label))?;
        summary.written.push(path);

        if Target::Waterbox.includes(label) {
            let path =
                write_segment(structure, segmentation, label, crd_path(&waterbox_dir, label))?;
            waterbox_files.push(path);
        }
    }
    summary.written.extend(waterbox_files);

    info!(
        "Exported segments {:?} ({} files) under {}",
        summary.labels,
        summary.written.len(),
        ligand_dir.display()
    );
    Ok(summary)
}
