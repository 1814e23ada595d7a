use super::ids::ResidueId;
use nalgebra::Point3;

/// Default occupancy used when a structure file leaves the column blank.
pub const DEFAULT_OCCUPANCY: f64 = 1.0;

/// Represents a single atom of a loaded structure.
///
/// Atoms carry only the information that survives a round trip through the
/// structure files handled by this crate: identity, coordinates and the
/// crystallographic columns. Chain and segment membership are reached through
/// the parent residue.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number as written in the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "C12").
    pub name: String,
    /// Element symbol, empty if the source file did not provide one.
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy column value.
    pub occupancy: f64,
    /// Temperature factor column value.
    pub b_factor: f64,
}

impl Atom {
    /// Creates a new `Atom` with default crystallographic columns.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number of the atom.
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(serial: usize, name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: String::new(),
            residue_id,
            position,
            occupancy: DEFAULT_OCCUPANCY,
            b_factor: 0.0,
        }
    }

    /// Returns `true` if the atom is a hydrogen.
    ///
    /// The element column is trusted when present; otherwise the first letter
    /// of the atom name decides, as CHARMM naming conventions start every
    /// hydrogen name with `H`.
    pub fn is_hydrogen(&self) -> bool {
        if !self.element.is_empty() {
            return self.element.eq_ignore_ascii_case("H") || self.element.eq_ignore_ascii_case("D");
        }
        self.name
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .starts_with(['H', 'h'])
    }
}
