/// Flat and smoothed normals for meshes whose vertices are duplicated per face
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};

/// Groups of buffer slots that hold the same physical vertex.
///
/// Every slot in `0..slot_count` belongs to exactly one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoincidenceTable {
    groups: Vec<Vec<usize>>,
    slot_count: usize,
}

impl CoincidenceTable {
    /// Validate hand-written groups against a buffer of `slot_count` slots
    pub fn new(groups: Vec<Vec<usize>>, slot_count: usize) -> Result<Self> {
        let mut seen = vec![false; slot_count];
        for &slot in groups.iter().flatten() {
            if slot >= slot_count {
                return Err(MeshError::SlotOutOfRange { slot, slot_count });
            }
            if seen[slot] {
                return Err(MeshError::DuplicateSlot(slot));
            }
            seen[slot] = true;
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(MeshError::MissingSlot(missing));
        }

        Ok(Self { groups, slot_count })
    }

    /// Every slot is its own vertex
    pub fn singletons(slot_count: usize) -> Self {
        Self {
            groups: (0..slot_count).map(|i| vec![i]).collect(),
            slot_count,
        }
    }

    /// Group slots whose positions lie within `epsilon` of the first slot in a group
    pub fn from_positions(positions: &[Point3<f32>], epsilon: f32) -> Self {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (slot, position) in positions.iter().enumerate() {
            let existing = groups
                .iter_mut()
                .find(|group| (positions[group[0]] - position).norm() <= epsilon);
            match existing {
                Some(group) => group.push(slot),
                None => groups.push(vec![slot]),
            }
        }

        Self {
            groups,
            slot_count: positions.len(),
        }
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }
}

/// Unit normal of the counter-clockwise triangle `a, b, c`
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let edge1 = b - a;
    let edge2 = c - a;

    edge1.cross(&edge2).normalize()
}

/// Average the face normals of every coincidence group.
///
/// The mean is written back to each slot of the group and is not renormalized,
/// so corners shared by faces pointing different ways come out shorter than unit length.
pub fn smooth_normals(
    face_normals: &[Vector3<f32>],
    table: &CoincidenceTable,
) -> Result<Vec<Vector3<f32>>> {
    if face_normals.len() != table.slot_count() {
        return Err(MeshError::LengthMismatch {
            what: "face normals",
            expected: table.slot_count(),
            got: face_normals.len(),
        });
    }

    Ok(group_means(face_normals, table))
}

/// Unchecked core of [`smooth_normals`]; `face_normals` must cover every slot of `table`
pub(crate) fn group_means(face_normals: &[Vector3<f32>], table: &CoincidenceTable) -> Vec<Vector3<f32>> {
    let mut smoothed = face_normals.to_vec();
    for group in table.groups() {
        if group.is_empty() {
            continue;
        }
        let sum: Vector3<f32> = group.iter().map(|&slot| face_normals[slot]).sum();
        let mean = sum / group.len() as f32;
        for &slot in group {
            smoothed[slot] = mean;
        }
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_table_rejects_out_of_range() {
        let err = CoincidenceTable::new(vec![vec![0, 3]], 3).unwrap_err();
        assert_eq!(err, MeshError::SlotOutOfRange { slot: 3, slot_count: 3 });
    }

    #[test]
    fn test_table_rejects_duplicates_and_gaps() {
        assert_eq!(
            CoincidenceTable::new(vec![vec![0, 1], vec![1, 2]], 3).unwrap_err(),
            MeshError::DuplicateSlot(1)
        );
        assert_eq!(
            CoincidenceTable::new(vec![vec![0], vec![2]], 3).unwrap_err(),
            MeshError::MissingSlot(1)
        );
    }

    #[test]
    fn test_singletons_leave_normals_unchanged() {
        let normals = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
        ];
        let smoothed = smooth_normals(&normals, &CoincidenceTable::singletons(3)).unwrap();
        assert_eq!(smoothed, normals);
    }

    #[test]
    fn test_cube_corner_average() {
        let normals = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let table = CoincidenceTable::new(vec![vec![0, 1, 2]], 3).unwrap();
        let smoothed = smooth_normals(&normals, &table).unwrap();
        for n in smoothed {
            assert_relative_eq!(n, Vector3::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_length_mismatch() {
        let err = smooth_normals(&[Vector3::x()], &CoincidenceTable::singletons(2)).unwrap_err();
        assert!(matches!(err, MeshError::LengthMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_from_positions_groups_coincident_slots() {
        let positions = vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 1e-7),
        ];
        let table = CoincidenceTable::from_positions(&positions, 1e-5);
        assert_eq!(table.groups(), &[vec![0, 2], vec![1, 3]]);
        assert!(CoincidenceTable::new(table.groups().to_vec(), 4).is_ok());
    }

    #[test]
    fn test_face_normal_ccw() {
        let n = face_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(n, Vector3::z(), epsilon = 1e-6);
    }
}
