use crate::core::models::structure::Structure;
use crate::segments::classifier::Segmentation;
use crate::segments::export::Target;
use crate::segments::names::is_protein_label;
use std::fmt;

/// Comment line that opens and closes every generated block.
pub const SEPARATOR: &str =
    "!-------------------------------------------------------------------------------";

/// An immutable fragment of CHARMM input.
///
/// Blocks always end with a newline so that concatenating them yields a
/// valid script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block(String);

impl Block {
    fn from_lines(lines: &[&str]) -> Self {
        let mut text = String::new();
        text.push_str(SEPARATOR);
        text.push('\n');
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(SEPARATOR);
        text.push('\n');
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Block {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn segment_file(prefix: &str, segid: &str) -> String {
    if prefix.is_empty() {
        format!("{}.crd", segid.to_lowercase())
    } else {
        format!("{}_{}.crd", prefix.to_lowercase(), segid.to_lowercase())
    }
}

fn read_segment(file: &str, generate: String) -> Vec<String> {
    vec![
        format!("open read card unit 10 name {}", file),
        "read sequence coor card unit 10 resid".to_string(),
        generate,
        String::new(),
        format!("open read unit 10 card name {}", file),
        "read coor unit 10 card resid".to_string(),
    ]
}

fn block_of(lines: Vec<String>) -> Block {
    let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
    Block::from_lines(&borrowed)
}

/// Reads a protein segment and generates it with charged termini.
///
/// The coordinate file is `{protein_id}_{segid}.crd`, lower-cased, or just
/// `{segid}.crd` when `protein_id` is empty.
pub fn protein_block(protein_id: &str, segid: &str) -> Block {
    let mut lines = vec!["! PROTEIN:".to_string()];
    lines.extend(read_segment(
        &segment_file(protein_id, segid),
        format!("generate {} setup warn first NTER last CTER", segid.to_uppercase()),
    ));
    block_of(lines)
}

/// Reads a ligand segment from `{ligand_id}.crd` without terminal patches.
pub fn ligand_block(ligand_id: &str, segid: &str) -> Block {
    block_of(read_segment(
        &format!("{}.crd", ligand_id.to_lowercase()),
        format!("generate {} setup warn first none last none", segid.to_uppercase()),
    ))
}

/// Reads a water segment; angles and dihedrals are not auto-generated.
pub fn water_block(protein_id: &str, segid: &str) -> Block {
    block_of(read_segment(
        &segment_file(protein_id, segid),
        format!("generate {} setup warn noangle nodihedral", segid.to_uppercase()),
    ))
}

/// Rebuilds hydrogens everywhere except in the given segments, whose explicit
/// hydrogen coordinates are kept. The `START_HBUILD`/`END_HBUILD` echoes
/// delimit the HBUILD report in the CHARMM log.
pub fn hbuild_preserve_explicit_h<S: AsRef<str>>(segids: &[S]) -> Block {
    let selection = segids
        .iter()
        .map(|s| format!("segid {}", s.as_ref()))
        .collect::<Vec<_>>()
        .join(" .or. ");
    block_of(vec![
        "! MOD: HBUILD control - preserve explicit H-coordinates".to_string(),
        "prnlev 5".to_string(),
        "echo START_HBUILD".to_string(),
        format!("hbuild sele hydr .and. .not. ({}) end", selection),
        "echo END_HBUILD".to_string(),
    ])
}

/// Prints the parameters CHARMM actually used, between `START_PAR` and
/// `END_PAR` echoes.
pub fn parameter_print() -> Block {
    Block::from_lines(&[
        "! MOD: Print used parameters",
        "echo START_PAR",
        "print para used",
        "echo END_PAR",
    ])
}

/// Ordered collection of blocks inserted into one simulation target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSet {
    blocks: Vec<Block>,
}

impl BlockSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks joined in insertion order.
    pub fn concatenated(&self) -> String {
        self.blocks.iter().map(Block::as_str).collect()
    }

    /// Builds the blocks that set up `target`:
    ///
    /// 1. a protein block per protein segment (complex only),
    /// 2. a ligand block per heteroatom segment,
    /// 3. HBUILD control preserving the hydrogens of heteroatom segments that
    ///    carry explicit hydrogens (omitted when none do),
    /// 4. the parameter print.
    ///
    /// Segment files are referenced by their lower-cased labels, matching the
    /// names written by [`export_segments`](crate::segments::export::export_segments).
    pub fn for_target(structure: &Structure, segmentation: &Segmentation, target: Target) -> Self {
        let mut set = Self::new();

        if target == Target::Complex {
            for label in segmentation.labels() {
                if is_protein_label(label) {
                    set.push(protein_block("", label));
                }
            }
        }

        let hetero_labels = segmentation.heteroatom_labels();
        for label in &hetero_labels {
            set.push(ligand_block(label, label));
        }

        let preserved: Vec<&str> = hetero_labels
            .into_iter()
            .filter(|label| has_explicit_hydrogens(structure, segmentation, label))
            .collect();
        if !preserved.is_empty() {
            set.push(hbuild_preserve_explicit_h(&preserved));
        }

        set.push(parameter_print());
        set
    }
}

fn has_explicit_hydrogens(structure: &Structure, segmentation: &Segmentation, label: &str) -> bool {
    segmentation.segment(label).is_some_and(|segment| {
        segment
            .atoms
            .iter()
            .filter_map(|&id| structure.atom(id))
            .any(|atom| atom.is_hydrogen())
    })
}

impl IntoIterator for BlockSet {
    type Item = Block;
    type IntoIter = std::vec::IntoIter<Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::segments::classifier::classify;
    use crate::segments::names::ResidueNames;
    use nalgebra::Point3;

    #[test]
    fn protein_block_matches_charmm_layout() {
        let block = protein_block("1abc", "PROA");
        let expected = format!(
            "{sep}\n! PROTEIN:\nopen read card unit 10 name 1abc_proa.crd\n\
             read sequence coor card unit 10 resid\n\
             generate PROA setup warn first NTER last CTER\n\n\
             open read unit 10 card name 1abc_proa.crd\n\
             read coor unit 10 card resid\n{sep}\n",
            sep = SEPARATOR
        );
        assert_eq!(block.as_str(), expected);
    }

    #[test]
    fn protein_block_without_protein_id_uses_segment_file() {
        let block = protein_block("", "proa");
        assert!(block.as_str().contains("open read card unit 10 name proa.crd\n"));
        assert!(block.as_str().contains("open read unit 10 card name proa.crd\n"));
        assert!(block.as_str().contains("generate PROA setup"));
    }

    #[test]
    fn ligand_block_has_no_terminal_patches() {
        let block = ligand_block("LIG1", "heta");
        assert!(block.as_str().contains("name lig1.crd"));
        assert!(block.as_str().contains("generate HETA setup warn first none last none\n"));
        assert!(!block.as_str().contains("! PROTEIN:"));
    }

    #[test]
    fn water_block_disables_angles_and_dihedrals() {
        let block = water_block("1abc", "SOLV");
        assert!(block.as_str().contains("name 1abc_solv.crd"));
        assert!(block.as_str().contains("generate SOLV setup warn noangle nodihedral\n"));
    }

    #[test]
    fn separator_is_bang_and_79_dashes() {
        assert_eq!(SEPARATOR.len(), 80);
        assert!(SEPARATOR.starts_with('!'));
        assert!(SEPARATOR[1..].chars().all(|c| c == '-'));
        let block = parameter_print();
        assert!(block.as_str().starts_with(SEPARATOR));
        assert!(block.as_str().ends_with(&format!("{}\n", SEPARATOR)));
    }

    #[test]
    fn hbuild_selection_joins_segments_with_or() {
        let block = hbuild_preserve_explicit_h(&["HETA", "HETB"]);
        assert!(block
            .as_str()
            .contains("hbuild sele hydr .and. .not. (segid HETA .or. segid HETB) end\n"));
        assert!(block.as_str().contains("prnlev 5\necho START_HBUILD\n"));
        assert!(block.as_str().contains("echo END_HBUILD\n"));

        let single = hbuild_preserve_explicit_h(&["HETA"]);
        assert!(single.as_str().contains("(segid HETA) end"));
    }

    #[test]
    fn parameter_print_block_content() {
        assert_eq!(
            parameter_print().as_str(),
            format!(
                "{sep}\n! MOD: Print used parameters\necho START_PAR\nprint para used\necho END_PAR\n{sep}\n",
                sep = SEPARATOR
            )
        );
    }

    fn structure_with_ligand(hydrogens: bool) -> Structure {
        let mut structure = Structure::new();
        let a = structure.add_chain("A");
        let ala = structure.add_residue(a, 1, None, "ALA", "").unwrap();
        structure
            .add_atom_to_residue(ala, Atom::new(1, "CA", ala, Point3::origin()))
            .unwrap();
        let b = structure.add_chain("B");
        let lig = structure.add_residue(b, 2, None, "LIG", "").unwrap();
        structure
            .add_atom_to_residue(lig, Atom::new(2, "C1", lig, Point3::origin()))
            .unwrap();
        if hydrogens {
            structure
                .add_atom_to_residue(lig, Atom::new(3, "H1", lig, Point3::origin()))
                .unwrap();
        }
        structure
    }

    #[test]
    fn complex_block_set_orders_protein_ligand_hbuild_parameters() {
        let structure = structure_with_ligand(true);
        let segmentation = classify(&structure, &ResidueNames::new()).unwrap();
        let set = BlockSet::for_target(&structure, &segmentation, Target::Complex);

        assert_eq!(set.len(), 4);
        assert!(set.blocks()[0].as_str().contains("generate PROA"));
        assert!(set.blocks()[1].as_str().contains("generate HETA"));
        assert!(set.blocks()[2].as_str().contains("(segid HETA)"));
        assert_eq!(set.blocks()[3], parameter_print());
    }

    #[test]
    fn waterbox_block_set_has_no_protein() {
        let structure = structure_with_ligand(true);
        let segmentation = classify(&structure, &ResidueNames::new()).unwrap();
        let set = BlockSet::for_target(&structure, &segmentation, Target::Waterbox);

        assert_eq!(set.len(), 3);
        assert!(!set.concatenated().contains("! PROTEIN:"));
        assert!(set.concatenated().contains("name heta.crd"));
    }

    #[test]
    fn hbuild_is_omitted_without_explicit_ligand_hydrogens() {
        let structure = structure_with_ligand(false);
        let segmentation = classify(&structure, &ResidueNames::new()).unwrap();
        let set = BlockSet::for_target(&structure, &segmentation, Target::Complex);

        assert_eq!(set.len(), 3);
        assert!(!set.concatenated().contains("START_HBUILD"));
    }
}
