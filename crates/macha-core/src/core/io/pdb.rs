use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Atom, DEFAULT_OCCUPANCY};
use crate::core::models::ids::ResidueId;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

/// Shortest ATOM/HETATM line that still carries all three coordinates.
const MIN_COORDINATE_LINE_LEN: usize = 54;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Non-coordinate records (HEADER, REMARK, CRYST1, ...) in file order.
    pub header_lines: Vec<String>,
    /// Number of atoms dropped because they belong to a secondary altloc.
    pub skipped_altlocs: usize,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_optional_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    default: f64,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(default)
    } else {
        parse_float(line, line_num, start, end)
    }
}

/// Identity of the residue an ATOM/HETATM line belongs to. A new residue
/// starts whenever any of these fields changes between consecutive atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResidueKey {
    chain: String,
    number: isize,
    insertion_code: Option<char>,
    name: String,
    segment_id: String,
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut structure = Structure::new();
        let mut metadata = PdbMetadata::default();

        let mut current: Option<(ResidueKey, ResidueId)> = None;
        let mut atom_count = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_COORDINATE_LINE_LEN {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let alt_loc = slice_and_trim(&line, 16, 17);
                    if !alt_loc.is_empty() && alt_loc != "A" {
                        metadata.skipped_altlocs += 1;
                        continue;
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }

                    // Large solvated systems overflow the five serial columns.
                    let serial = slice_and_trim(&line, 6, 11)
                        .parse::<usize>()
                        .unwrap_or(atom_count + 1);

                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let number: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;

                    let key = ResidueKey {
                        chain: slice_and_trim(&line, 21, 22).to_string(),
                        number,
                        insertion_code: slice_and_trim(&line, 26, 27).chars().next(),
                        name: slice_and_trim(&line, 17, 21).to_string(),
                        segment_id: slice_and_trim(&line, 72, 76).to_string(),
                    };

                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;
                    let occupancy =
                        parse_optional_float(&line, line_num, 54, 60, DEFAULT_OCCUPANCY)?;
                    let b_factor = parse_optional_float(&line, line_num, 60, 66, 0.0)?;

                    let continuing = current
                        .as_ref()
                        .filter(|(current_key, _)| *current_key == key)
                        .map(|(_, id)| *id);
                    let residue_id = match continuing {
                        Some(id) => id,
                        None => {
                            let chain_id = structure.add_chain(&key.chain);
                            let id = structure
                                .add_residue(
                                    chain_id,
                                    key.number,
                                    key.insertion_code,
                                    &key.name,
                                    &key.segment_id,
                                )
                                .ok_or_else(|| {
                                    PdbError::MissingRecord(format!("chain '{}'", key.chain))
                                })?;
                            current = Some((key, id));
                            id
                        }
                    };

                    let mut atom = Atom::new(serial, name, residue_id, Point3::new(x, y, z));
                    atom.occupancy = occupancy;
                    atom.b_factor = b_factor;
                    atom.element = slice_and_trim(&line, 76, 78).to_string();
                    structure.add_atom_to_residue(residue_id, atom);
                    atom_count += 1;
                }
                "TER" => current = None,
                "MODEL" => {}
                "ENDMDL" | "END" => break,
                _ => {
                    if !line.trim().is_empty() {
                        metadata.header_lines.push(line.clone());
                    }
                }
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok((structure, metadata))
    }
}
