use super::names::{
    HETERO_PREFIX, IONS_LABEL, PROTEIN_PREFIX, ResidueCategory, ResidueNames, SOLVENT_LABEL,
    is_hetero_label, is_protein_label,
};
use crate::core::models::ids::{AtomId, ChainId};
use crate::core::models::structure::Structure;
use slotmap::SecondaryMap;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// How segment labels were obtained for a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    /// Labels were derived from chain identifiers and residue names
    /// (e.g. a file exported from a generic viewer).
    ChainLabelled,
    /// The file already carried CHARMM segment ids, which were used as-is
    /// (e.g. a system built with CHARMM-GUI).
    SegmentLabelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub label: String,
    pub atoms: Vec<AtomId>, // Member atoms in file order
}

/// Derived mapping from atoms to segment labels.
///
/// The classified structure is never modified; every atom of it maps to
/// exactly one segment of this value.
#[derive(Debug, Clone)]
pub struct Segmentation {
    source: LabelSource,
    segments: Vec<Segment>,
    atom_segment: SecondaryMap<AtomId, usize>,
}

impl Segmentation {
    fn new(source: LabelSource) -> Self {
        Self {
            source,
            segments: Vec::new(),
            atom_segment: SecondaryMap::new(),
        }
    }

    fn assign(&mut self, atom_id: AtomId, label: &str) {
        let index = match self.segments.iter().position(|s| s.label == label) {
            Some(index) => index,
            None => {
                self.segments.push(Segment {
                    label: label.to_string(),
                    atoms: Vec::new(),
                });
                self.segments.len() - 1
            }
        };
        self.segments[index].atoms.push(atom_id);
        self.atom_segment.insert(atom_id, index);
    }

    pub fn source(&self) -> LabelSource {
        self.source
    }

    /// Segments in order of first appearance in the structure.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct labels in order of first appearance.
    pub fn labels(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn segment(&self, label: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.segment(label).is_some()
    }

    pub fn label_of(&self, atom_id: AtomId) -> Option<&str> {
        self.atom_segment
            .get(atom_id)
            .map(|&i| self.segments[i].label.as_str())
    }

    pub fn heteroatom_labels(&self) -> Vec<&str> {
        self.labels()
            .into_iter()
            .filter(|l| is_hetero_label(l))
            .collect()
    }

    pub fn protein_labels(&self) -> Vec<&str> {
        self.labels()
            .into_iter()
            .filter(|l| is_protein_label(l))
            .collect()
    }

    pub fn atom_count(&self) -> usize {
        self.atom_segment.len()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Structure contains no atoms")]
    EmptyStructure,
    #[error("Amino acid {residue} {number} has a blank chain identifier")]
    BlankChainId { residue: String, number: isize },
    #[error("More than 26 heteroatom chains; segment labels {prefix}A-{prefix}Z are exhausted")]
    TooManyHeteroSegments { prefix: &'static str },
}

/// Partitions the atoms of a structure into CHARMM segments.
///
/// If the atoms carry more than one distinct chain identifier, the chain
/// column is trusted and residue names decide the label inside each chain:
/// amino acids become `PRO{chain}`, waters `SOLV`, ions `IONS`, and every chain
/// holding anything else gets its own heteroatom segment (`HETA`, `HETB`, ... in
/// order of appearance). A single chain value means the file already carries
/// segment ids, which are used directly; if some residue lacks one, the
/// residue-name rules are applied instead.
pub fn classify(
    structure: &Structure,
    names: &ResidueNames,
) -> Result<Segmentation, ClassificationError> {
    if structure.is_empty() {
        return Err(ClassificationError::EmptyStructure);
    }

    let chain_ids = structure.distinct_chain_ids();
    debug!("Distinct chain identifiers: {:?}", chain_ids);

    let segmentation = if chain_ids.len() > 1 {
        classify_by_residue_names(structure, names)?
    } else if structure.residues_iter().all(|(_, r)| r.has_segment_id()) {
        classify_by_segment_ids(structure)
    } else {
        warn!(
            "Single chain without complete segment ids; falling back to residue-name classification."
        );
        classify_by_residue_names(structure, names)?
    };

    debug!(
        "Classified {} atoms into segments {:?}",
        segmentation.atom_count(),
        segmentation.labels()
    );
    Ok(segmentation)
}

fn classify_by_segment_ids(structure: &Structure) -> Segmentation {
    let mut segmentation = Segmentation::new(LabelSource::SegmentLabelled);
    for (_, residue) in structure.residues_iter() {
        let label = residue.segment_id.trim();
        for &atom_id in residue.atoms() {
            segmentation.assign(atom_id, label);
        }
    }
    segmentation
}

fn classify_by_residue_names(
    structure: &Structure,
    names: &ResidueNames,
) -> Result<Segmentation, ClassificationError> {
    let mut segmentation = Segmentation::new(LabelSource::ChainLabelled);
    let mut hetero_labels: HashMap<ChainId, String> = HashMap::new();

    for (_, residue) in structure.residues_iter() {
        let chain_letter = structure
            .chain(residue.chain_id)
            .map(|c| c.id.trim())
            .unwrap_or("");

        let label = match names.categorize(&residue.name) {
            ResidueCategory::AminoAcid => {
                if chain_letter.is_empty() {
                    return Err(ClassificationError::BlankChainId {
                        residue: residue.name.clone(),
                        number: residue.number,
                    });
                }
                format!("{}{}", PROTEIN_PREFIX, chain_letter)
            }
            ResidueCategory::Water => SOLVENT_LABEL.to_string(),
            ResidueCategory::Ion => IONS_LABEL.to_string(),
            ResidueCategory::Hetero => {
                let next_index = hetero_labels.len();
                match hetero_labels.get(&residue.chain_id) {
                    Some(label) => label.clone(),
                    None => {
                        let letter = u8::try_from(next_index)
                            .ok()
                            .filter(|&i| i < 26)
                            .map(|i| (b'A' + i) as char)
                            .ok_or(ClassificationError::TooManyHeteroSegments {
                                prefix: HETERO_PREFIX,
                            })?;
                        let label = format!("{}{}", HETERO_PREFIX, letter);
                        debug!(
                            "Residue {} {} in chain '{}' opens heteroatom segment {}",
                            residue.name, residue.number, chain_letter, label
                        );
                        hetero_labels.insert(residue.chain_id, label.clone());
                        label
                    }
                }
            }
        };

        for &atom_id in residue.atoms() {
            segmentation.assign(atom_id, &label);
        }
    }

    Ok(segmentation)
}
