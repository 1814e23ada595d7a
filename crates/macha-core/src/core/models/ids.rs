//! Stable arena keys for the structure model.

use slotmap::new_key_type;

new_key_type! {
    /// Key of an atom inside a [`Structure`](super::structure::Structure).
    pub struct AtomId;
    /// Key of a residue inside a [`Structure`](super::structure::Structure).
    pub struct ResidueId;
    /// Key of a chain inside a [`Structure`](super::structure::Structure).
    pub struct ChainId;
}
