use super::ids::{AtomId, ChainId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                // Residue sequence number from source file
    pub insertion_code: Option<char>, // Insertion code, if any
    pub name: String,                 // Name of the residue (e.g., "ALA", "LIG", "TIP3")
    pub segment_id: String,           // Segment id read from the file, empty if absent
    pub chain_id: ChainId,            // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,    // Atoms of this residue in file order
}

impl Residue {
    pub(crate) fn new(
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        segment_id: &str,
        chain_id: ChainId,
    ) -> Self {
        Self {
            number,
            insertion_code,
            name: name.to_string(),
            segment_id: segment_id.to_string(),
            chain_id,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_id: AtomId) {
        self.atoms.push(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn has_segment_id(&self) -> bool {
        !self.segment_id.trim().is_empty()
    }

    /// Residue identifier as CHARMM reads it in the `resid` column, i.e. the
    /// sequence number followed by the insertion code.
    pub fn resid(&self) -> String {
        match self.insertion_code {
            Some(code) => format!("{}{}", self.number, code),
            None => self.number.to_string(),
        }
    }
}
