use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

const DEFAULT_TITLE: &str = "GENERATED BY MACHA";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrdMetadata {
    /// Title lines without the leading `*`.
    pub title: Vec<String>,
    /// Whether the count line carried the `EXT` keyword.
    pub extended: bool,
}

#[derive(Debug, Error)]
pub enum CrdError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Atom count mismatch: header declares {expected}, file contains {found}")]
    AtomCountMismatch { expected: usize, found: usize },
    #[error("Atom {0:?} does not belong to the structure being written")]
    UnknownAtom(AtomId),
}

/// CHARMM card coordinate file.
///
/// Files are always written in the extended (`EXT`) layout,
/// `(2I10,2X,A8,2X,A8,3F20.10,2X,A8,2X,A8,F20.10)`, which is what
/// `read coor card` expects for segment ids and residue names longer than
/// four characters. Reading accepts both the standard and extended layout.
pub struct CrdFile;

impl CrdFile {
    /// Writes the given atoms as one CHARMM segment.
    ///
    /// Every atom is written with `segment_id` in the segid column regardless of
    /// the segment id stored in the structure, so the caller decides segment
    /// membership. Residues are renumbered sequentially from 1 in the order
    /// they are first met; the original residue number is kept in the resid
    /// column.
    ///
    /// # Errors
    ///
    /// Returns [`CrdError::UnknownAtom`] if an id is not part of `structure`,
    /// or an I/O error if writing fails.
    pub fn write_atoms(
        structure: &Structure,
        atom_ids: &[AtomId],
        segment_id: &str,
        writer: &mut impl Write,
    ) -> Result<(), CrdError> {
        writeln!(writer, "* {}", DEFAULT_TITLE)?;
        writeln!(writer, "* SEGMENT {}", segment_id)?;
        writeln!(writer, "*")?;
        writeln!(writer, "{:>10}  EXT", atom_ids.len())?;

        let mut last_residue: Option<ResidueId> = None;
        let mut residue_counter = 0usize;

        for (i, &atom_id) in atom_ids.iter().enumerate() {
            let atom = structure
                .atom(atom_id)
                .ok_or(CrdError::UnknownAtom(atom_id))?;
            let residue = structure
                .residue(atom.residue_id)
                .ok_or(CrdError::UnknownAtom(atom_id))?;

            if last_residue != Some(atom.residue_id) {
                residue_counter += 1;
                last_residue = Some(atom.residue_id);
            }

            writeln!(
                writer,
                "{:>10}{:>10}  {:<8}  {:<8}{:>20.10}{:>20.10}{:>20.10}  {:<8}  {:<8}{:>20.10}",
                i + 1,
                residue_counter,
                residue.name,
                atom.name,
                atom.position.x,
                atom.position.y,
                atom.position.z,
                segment_id,
                residue.resid(),
                0.0
            )?;
        }
        Ok(())
    }

    /// Writes the given atoms as one CHARMM segment to a file, replacing any
    /// existing file at `path`.
    pub fn write_atoms_to_path<P: AsRef<Path>>(
        structure: &Structure,
        atom_ids: &[AtomId],
        segment_id: &str,
        path: P,
    ) -> Result<(), CrdError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_atoms(structure, atom_ids, segment_id, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn split_resid(resid: &str) -> (Option<isize>, Option<char>) {
    let digits_end = resid
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
        .map_or(resid.len(), |(i, _)| i);
    let number = resid[..digits_end].parse().ok();
    let code = resid[digits_end..].chars().next();
    (number, code)
}

impl StructureFile for CrdFile {
    type Metadata = CrdMetadata;
    type Error = CrdError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut structure = Structure::new();
        let mut metadata = CrdMetadata::default();

        let mut expected: Option<usize> = None;
        let mut found = 0usize;
        let mut current: Option<((String, String), ResidueId)> = None;
        // CRD files carry no chain column; segment ids alone label residues.
        let chain_id = structure.add_chain("");

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if expected.is_none() {
                if let Some(title) = line.strip_prefix('*') {
                    let title = title.trim();
                    if !title.is_empty() {
                        metadata.title.push(title.to_string());
                    }
                    continue;
                }
                let mut parts = line.split_whitespace();
                let count = parts.next().and_then(|s| s.parse().ok()).ok_or_else(|| {
                    CrdError::Parse {
                        line: line_num,
                        message: format!("expected atom count, found '{}'", line.trim()),
                    }
                })?;
                metadata.extended = parts.next().is_some_and(|s| s.eq_ignore_ascii_case("EXT"));
                expected = Some(count);
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 9 {
                return Err(CrdError::Parse {
                    line: line_num,
                    message: format!("expected at least 9 fields, found {}", fields.len()),
                });
            }
            let coordinate = |i: usize| -> Result<f64, CrdError> {
                fields[i].parse().map_err(|_| CrdError::Parse {
                    line: line_num,
                    message: format!("invalid coordinate '{}'", fields[i]),
                })
            };
            let position = Point3::new(coordinate(4)?, coordinate(5)?, coordinate(6)?);
            let res_name = fields[2];
            let atom_name = fields[3];
            let segment_id = fields[7];
            let resid = fields[8];

            let key = (segment_id.to_string(), resid.to_string());
            let continuing = current
                .as_ref()
                .filter(|(current_key, _)| *current_key == key)
                .map(|(_, id)| *id);
            let residue_id = match continuing {
                Some(id) => id,
                None => {
                    let (number, code) = split_resid(resid);
                    let number = number.ok_or_else(|| CrdError::Parse {
                        line: line_num,
                        message: format!("invalid resid '{}'", resid),
                    })?;
                    let id = structure
                        .add_residue(chain_id, number, code, res_name, segment_id)
                        .ok_or_else(|| CrdError::Parse {
                            line: line_num,
                            message: format!("cannot open segment '{}'", segment_id),
                        })?;
                    current = Some((key, id));
                    id
                }
            };

            found += 1;
            structure.add_atom_to_residue(residue_id, Atom::new(found, atom_name, residue_id, position));
        }

        let expected = expected.ok_or_else(|| CrdError::Parse {
            line: 0,
            message: "missing atom count line".to_string(),
        })?;
        if expected != found {
            return Err(CrdError::AtomCountMismatch { expected, found });
        }
        Ok((structure, metadata))
    }
}
