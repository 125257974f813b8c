use thiserror::Error;

/// Errors raised while assembling or selecting a polyhedron mesh.
///
/// All of these surface while a mesh is being built; once a mesh
/// exists nothing on it can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("slot {slot} is out of range for a mesh with {slot_count} slots")]
    SlotOutOfRange { slot: usize, slot_count: usize },

    #[error("slot {0} appears in more than one coincidence group")]
    DuplicateSlot(usize),

    #[error("slot {0} is not covered by any coincidence group")]
    MissingSlot(usize),

    #[error("{what} has {got} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("triangle list length {0} is not a multiple of 3")]
    NotTriangles(usize),

    #[error("unknown shape '{0}'")]
    UnknownShape(String),
}

pub type Result<T> = std::result::Result<T, MeshError>;
