use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use serde::Serialize;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::io::Write;

/// Represents a loaded molecular structure with atoms, residues and chains.
///
/// This struct is the in-memory form of a combined protein/ligand/solvent
/// structure file. It is built once by a reader and treated as read-only
/// afterwards; segment assignment is derived from it rather than written
/// back into it.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Primary storage for atoms, iterated in insertion (file) order.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in order of first appearance.
    chain_order: Vec<ChainId>,
    /// Residues in file order.
    residue_order: Vec<ResidueId>,
    /// Lookup map for finding chains by their identifier.
    chain_id_map: HashMap<String, ChainId>,
}

/// One row of the tabular atom view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomRow {
    pub index: usize,
    pub serial: usize,
    pub name: String,
    pub resname: String,
    pub resid: String,
    pub chain: String,
    pub segid: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Structure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all atoms in file order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.residue_order.iter().flat_map(move |&res_id| {
            self.residues[res_id]
                .atoms()
                .iter()
                .map(move |&atom_id| (atom_id, &self.atoms[atom_id]))
        })
    }

    /// Returns an iterator over all residues in file order.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residue_order
            .iter()
            .map(move |&id| (id, &self.residues[id]))
    }

    /// Returns an iterator over all chains in order of first appearance.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order.iter().map(move |&id| (id, &self.chains[id]))
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn find_chain_by_id(&self, id: &str) -> Option<ChainId> {
        self.chain_id_map.get(id).copied()
    }

    /// Returns the chain a given atom belongs to.
    pub fn chain_of_atom(&self, atom_id: AtomId) -> Option<&Chain> {
        let atom = self.atoms.get(atom_id)?;
        let residue = self.residues.get(atom.residue_id)?;
        self.chains.get(residue.chain_id)
    }

    /// Adds a new chain to the system or returns the existing one.
    pub fn add_chain(&mut self, id: &str) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_order.push(chain_id);
        self.chain_id_map.insert(id.to_string(), chain_id);
        chain_id
    }

    /// Appends a residue to a chain.
    ///
    /// Residues are never merged: PDB files may legitimately repeat a sequence
    /// number (e.g. thousands of waters wrapping around 9999), so identity is
    /// decided by the reader, not by the number.
    ///
    /// # Return
    ///
    /// Returns `None` if the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        segment_id: &str,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let residue_id = self.residues.insert(Residue::new(
            number,
            insertion_code,
            name,
            segment_id,
            chain_id,
        ));
        chain.residues.push(residue_id);
        self.residue_order.push(residue_id);
        Some(residue_id)
    }

    /// Adds an atom to an existing residue.
    ///
    /// # Return
    ///
    /// Returns `None` if the residue does not exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        atom.residue_id = residue_id;
        let atom_id = self.atoms.insert(atom);
        self.residues[residue_id].add_atom(atom_id);
        Some(atom_id)
    }

    /// Returns the distinct chain identifiers carried by the atoms, in order
    /// of first appearance.
    pub fn distinct_chain_ids(&self) -> Vec<&str> {
        self.chains_iter()
            .filter(|(_, chain)| {
                chain
                    .residues()
                    .iter()
                    .any(|&r| !self.residues[r].atoms().is_empty())
            })
            .map(|(_, chain)| chain.id.as_str())
            .collect()
    }

    /// Builds the tabular atom view, one row per atom in file order.
    pub fn atom_table(&self) -> Vec<AtomRow> {
        self.atoms_iter()
            .enumerate()
            .map(|(index, (_, atom))| {
                let residue = &self.residues[atom.residue_id];
                let chain = &self.chains[residue.chain_id];
                AtomRow {
                    index,
                    serial: atom.serial,
                    name: atom.name.clone(),
                    resname: residue.name.clone(),
                    resid: residue.resid(),
                    chain: chain.id.clone(),
                    segid: residue.segment_id.clone(),
                    x: atom.position.x,
                    y: atom.position.y,
                    z: atom.position.z,
                }
            })
            .collect()
    }

    /// Writes the tabular atom view as CSV with a header row.
    pub fn write_atom_table(&self, writer: impl Write) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in self.atom_table() {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn two_chain_structure() -> (Structure, Vec<AtomId>) {
        let mut structure = Structure::new();
        let chain_a = structure.add_chain("A");
        let chain_b = structure.add_chain("B");

        let gly = structure
            .add_residue(chain_a, 1, None, "GLY", "")
            .unwrap();
        let lig = structure
            .add_residue(chain_b, 900, None, "LIG", "")
            .unwrap();

        let n = structure
            .add_atom_to_residue(gly, Atom::new(1, "N", gly, Point3::new(0.0, 0.0, 0.0)))
            .unwrap();
        let ca = structure
            .add_atom_to_residue(gly, Atom::new(2, "CA", gly, Point3::new(1.5, 0.0, 0.0)))
            .unwrap();
        let c1 = structure
            .add_atom_to_residue(lig, Atom::new(3, "C1", lig, Point3::new(5.0, 5.0, 5.0)))
            .unwrap();

        (structure, vec![n, ca, c1])
    }

    #[test]
    fn structure_creation_and_access() {
        let (structure, atoms) = two_chain_structure();

        assert_eq!(structure.atom_count(), 3);
        assert_eq!(structure.residue_count(), 2);
        assert_eq!(structure.chains_iter().count(), 2);
        assert_eq!(structure.atom(atoms[1]).unwrap().name, "CA");
        assert_eq!(structure.chain_of_atom(atoms[2]).unwrap().id, "B");
    }

    #[test]
    fn add_chain_returns_existing_chain_for_same_id() {
        let mut structure = Structure::new();
        let first = structure.add_chain("A");
        let second = structure.add_chain("A");
        assert_eq!(first, second);
        assert_eq!(structure.chains_iter().count(), 1);
    }

    #[test]
    fn add_atom_to_missing_residue_returns_none() {
        let mut structure = Structure::new();
        let atom = Atom::new(1, "C", ResidueId::default(), Point3::origin());
        assert!(structure.add_atom_to_residue(ResidueId::default(), atom).is_none());
    }

    #[test]
    fn atoms_iter_follows_file_order_across_chains() {
        let (structure, atoms) = two_chain_structure();
        let order: Vec<_> = structure.atoms_iter().map(|(id, _)| id).collect();
        assert_eq!(order, atoms);
    }

    #[test]
    fn distinct_chain_ids_skips_empty_chains() {
        let (mut structure, _) = two_chain_structure();
        structure.add_chain("C");
        assert_eq!(structure.distinct_chain_ids(), vec!["A", "B"]);
    }

    #[test]
    fn atom_table_has_one_row_per_atom() {
        let (structure, _) = two_chain_structure();
        let table = structure.atom_table();

        assert_eq!(table.len(), 3);
        assert_eq!(table[2].resname, "LIG");
        assert_eq!(table[2].chain, "B");
        assert_eq!(table[2].resid, "900");
        assert_eq!(table[0].index, 0);
    }

    #[test]
    fn atom_table_is_written_as_csv() {
        let (structure, _) = two_chain_structure();
        let mut buffer = Vec::new();
        structure.write_atom_table(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "index,serial,name,resname,resid,chain,segid,x,y,z"
        );
        assert_eq!(lines.count(), 3);
    }
}
