use phf::{Set, phf_set};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Segment label reserved for bulk water.
pub const SOLVENT_LABEL: &str = "SOLV";
/// Segment label reserved for counter ions.
pub const IONS_LABEL: &str = "IONS";
/// Prefix of protein segment labels (`PROA`, `PROB`, ...).
pub const PROTEIN_PREFIX: &str = "PRO";
/// Prefix of heteroatom (ligand) segment labels (`HETA`, `HETB`, ...).
pub const HETERO_PREFIX: &str = "HET";

// The 20 standard amino acids plus the CHARMM histidine tautomers and
// phosphothreonine.
static AMINO_ACIDS: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "TPO", "HSD", "HSE",
};

static WATERS: Set<&'static str> = phf_set! {
    "HOH", "WAT", "TIP3", "TIP4", "SOL", "H2O",
};

static IONS: Set<&'static str> = phf_set! {
    "SOD", "CLA", "POT", "CES", "CAL", "MG", "ZN2", "NA", "CL", "K",
};

/// Returns `true` if `label` names a segment that never belongs to a solute.
pub fn is_solvent_or_ions(label: &str) -> bool {
    label == SOLVENT_LABEL || label == IONS_LABEL
}

/// Returns `true` if `label` is a heteroatom (ligand) segment label.
pub fn is_hetero_label(label: &str) -> bool {
    label.starts_with(HETERO_PREFIX)
}

/// Returns `true` if `label` is a protein segment label.
pub fn is_protein_label(label: &str) -> bool {
    label.starts_with(PROTEIN_PREFIX)
}

/// Chemical category of a residue as decided by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueCategory {
    AminoAcid,
    Water,
    Ion,
    Hetero,
}

/// Extra residue names merged on top of the built-in sets.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ResidueNamesFile {
    #[serde(default)]
    amino_acids: Vec<String>,
    #[serde(default)]
    waters: Vec<String>,
    #[serde(default)]
    ions: Vec<String>,
}

/// Residue-name knowledge used by the segment classifier.
///
/// The built-in sets cover standard CHARMM naming; projects with modified
/// residues (e.g. a non-standard protonation state) extend them from a TOML
/// file with `amino-acids`, `waters` and `ions` arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueNames {
    extra_amino_acids: HashSet<String>,
    extra_waters: HashSet<String>,
    extra_ions: HashSet<String>,
}

impl ResidueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ResidueNamesError> {
        let content = std::fs::read_to_string(path).map_err(|e| ResidueNamesError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: ResidueNamesFile =
            toml::from_str(&content).map_err(|e| ResidueNamesError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        let upper = |names: Vec<String>| -> HashSet<String> {
            names.into_iter().map(|n| n.trim().to_uppercase()).collect()
        };
        Ok(Self {
            extra_amino_acids: upper(file.amino_acids),
            extra_waters: upper(file.waters),
            extra_ions: upper(file.ions),
        })
    }

    pub fn with_amino_acid(mut self, name: &str) -> Self {
        self.extra_amino_acids.insert(name.to_uppercase());
        self
    }

    pub fn is_amino_acid(&self, name: &str) -> bool {
        AMINO_ACIDS.contains(name) || self.extra_amino_acids.contains(name)
    }

    pub fn is_water(&self, name: &str) -> bool {
        WATERS.contains(name) || self.extra_waters.contains(name)
    }

    pub fn is_ion(&self, name: &str) -> bool {
        IONS.contains(name) || self.extra_ions.contains(name)
    }

    /// Categorizes a residue by name. Names are compared after trimming and
    /// upper-casing.
    pub fn categorize(&self, residue_name: &str) -> ResidueCategory {
        let name = residue_name.trim().to_uppercase();
        if self.is_amino_acid(&name) {
            ResidueCategory::AminoAcid
        } else if self.is_water(&name) {
            ResidueCategory::Water
        } else if self.is_ion(&name) {
            ResidueCategory::Ion
        } else {
            ResidueCategory::Hetero
        }
    }
}

#[derive(Debug, Error)]
pub enum ResidueNamesError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}
