/// Fixed-topology polyhedra with switchable flat and smooth normals
use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::normals::{face_normal, group_means, smooth_normals, CoincidenceTable};

/// Positions closer than this are treated as the same physical vertex
const COINCIDENCE_EPSILON: f32 = 1e-5;

const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Which precomputed normal array feeds the live normal buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalSet {
    #[default]
    Flat,
    Smooth,
}

impl NormalSet {
    pub fn toggle(self) -> Self {
        match self {
            NormalSet::Flat => NormalSet::Smooth,
            NormalSet::Smooth => NormalSet::Flat,
        }
    }
}

impl fmt::Display for NormalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalSet::Flat => write!(f, "FLAT"),
            NormalSet::Smooth => write!(f, "SMOOTH"),
        }
    }
}

/// Construction options for a mesh
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshOptions {
    /// Paint every slot this RGBA color instead of the per-face palette
    pub color: Option<[f32; 4]>,
}

impl MeshOptions {
    pub fn with_color(color: [f32; 4]) -> Self {
        Self { color: Some(color) }
    }
}

/// Built-in solids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Pyramid,
    Octahedron,
}

impl Shape {
    pub fn build(self, options: MeshOptions) -> PolyhedronMesh {
        match self {
            Shape::Pyramid => PolyhedronMesh::pyramid(options),
            Shape::Octahedron => PolyhedronMesh::octahedron(options),
        }
    }
}

impl FromStr for Shape {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pyramid" => Ok(Shape::Pyramid),
            "octahedron" => Ok(Shape::Octahedron),
            _ => Err(MeshError::UnknownShape(s.to_string())),
        }
    }
}

/// A triangle list whose vertices are duplicated per face.
///
/// Every attribute is stored per slot. Slots that share a position are tied
/// together only through the coincidence table used to build `vertex_normals`.
#[derive(Debug, Clone)]
pub struct PolyhedronMesh {
    positions: Vec<Point3<f32>>,
    face_normals: Vec<Vector3<f32>>,
    vertex_normals: Vec<Vector3<f32>>,
    colors: Vec<[f32; 4]>,
    tex_coords: Vec<[f32; 2]>,
    normals: Vec<Vector3<f32>>,
    active: NormalSet,
    normals_dirty: bool,
}

impl PolyhedronMesh {
    /// Build a mesh from a triangle list, per-slot flat normals and a coincidence table
    pub fn new(
        positions: Vec<Point3<f32>>,
        face_normals: Vec<Vector3<f32>>,
        table: &CoincidenceTable,
        options: MeshOptions,
    ) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::NotTriangles(positions.len()));
        }
        if table.slot_count() != positions.len() {
            return Err(MeshError::LengthMismatch {
                what: "coincidence table",
                expected: positions.len(),
                got: table.slot_count(),
            });
        }
        let vertex_normals = smooth_normals(&face_normals, table)?;

        let slots = positions.len();
        Ok(Self {
            colors: vec![options.color.unwrap_or(DEFAULT_COLOR); slots],
            tex_coords: vec![[0.0, 0.0]; slots],
            normals: face_normals.clone(),
            positions,
            face_normals,
            vertex_normals,
            active: NormalSet::Flat,
            normals_dirty: false,
        })
    }

    /// Square pyramid: apex at (0, 1, 0) over a unit base on the y = 0 plane
    pub fn pyramid(options: MeshOptions) -> Self {
        let apex = Point3::new(0.0, 1.0, 0.0);
        let fl = Point3::new(-0.5, 0.0, 0.5);
        let fr = Point3::new(0.5, 0.0, 0.5);
        let br = Point3::new(0.5, 0.0, -0.5);
        let bl = Point3::new(-0.5, 0.0, -0.5);

        let triangles = [
            [apex, fl, fr], // front
            [apex, fr, br], // right
            [apex, br, bl], // back
            [apex, bl, fl], // left
            [fl, bl, br],   // bottom
            [br, fr, fl],
        ];
        // cyan, red, yellow, purple, green (bottom spans two triangles)
        let palette = [
            [0.0, 1.0, 1.0, 1.0],
            [1.0, 0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0, 1.0],
            [1.0, 0.0, 1.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
        ];
        let side = [[0.5, 1.0], [0.0, 0.0], [1.0, 0.0]];
        let tex_coords = [
            side,
            side,
            side,
            side,
            [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
            [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        ];

        Self::from_triangles(&triangles, &palette, &tex_coords, options)
    }

    /// Regular octahedron with unit edge length, centred on the origin
    pub fn octahedron(options: MeshOptions) -> Self {
        let h = std::f32::consts::SQRT_2 / 2.0;
        let top = Point3::new(0.0, h, 0.0);
        let v1 = Point3::new(0.5, 0.0, 0.5);
        let v2 = Point3::new(0.5, 0.0, -0.5);
        let v3 = Point3::new(-0.5, 0.0, -0.5);
        let v4 = Point3::new(-0.5, 0.0, 0.5);
        let bottom = Point3::new(0.0, -h, 0.0);

        let triangles = [
            [top, v1, v2],
            [top, v2, v3],
            [top, v3, v4],
            [top, v4, v1],
            [bottom, v2, v1],
            [bottom, v3, v2],
            [bottom, v4, v3],
            [bottom, v1, v4],
        ];
        let palette = [
            [1.0, 0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0, 1.0],
            [0.0, 0.0, 1.0, 1.0],
            [1.0, 0.0, 1.0, 1.0],
            [1.0, 0.5, 0.0, 1.0],
            [1.0, 1.0, 1.0, 1.0],
        ];
        // Equator unwrapped along v = 0.5, poles at v = 1 and v = 0
        let tex_coords = [
            [[0.5, 1.0], [0.0, 0.5], [0.25, 0.5]],
            [[0.5, 1.0], [0.25, 0.5], [0.5, 0.5]],
            [[0.5, 1.0], [0.5, 0.5], [0.75, 0.5]],
            [[0.5, 1.0], [0.75, 0.5], [1.0, 0.5]],
            [[0.5, 0.0], [0.25, 0.5], [0.0, 0.5]],
            [[0.5, 0.0], [0.5, 0.5], [0.25, 0.5]],
            [[0.5, 0.0], [0.75, 0.5], [0.5, 0.5]],
            [[0.5, 0.0], [1.0, 0.5], [0.75, 0.5]],
        ];

        Self::from_triangles(&triangles, &palette, &tex_coords, options)
    }

    fn from_triangles(
        triangles: &[[Point3<f32>; 3]],
        palette: &[[f32; 4]],
        tex_coords: &[[[f32; 2]; 3]],
        options: MeshOptions,
    ) -> Self {
        let positions: Vec<Point3<f32>> = triangles.iter().flatten().copied().collect();
        let face_normals: Vec<Vector3<f32>> = triangles
            .iter()
            .flat_map(|[a, b, c]| [face_normal(a, b, c); 3])
            .collect();
        let colors = match options.color {
            Some(color) => vec![color; positions.len()],
            None => palette.iter().flat_map(|&c| [c; 3]).collect(),
        };

        // One face normal per position, so the table and normals share a slot count
        let table = CoincidenceTable::from_positions(&positions, COINCIDENCE_EPSILON);
        let vertex_normals = group_means(&face_normals, &table);

        Self {
            colors,
            tex_coords: tex_coords.iter().flatten().copied().collect(),
            normals: face_normals.clone(),
            positions,
            face_normals,
            vertex_normals,
            active: NormalSet::Flat,
            normals_dirty: false,
        }
    }

    /// Replace the per-slot texture coordinates
    pub fn set_tex_coords(&mut self, tex_coords: Vec<[f32; 2]>) -> Result<()> {
        if tex_coords.len() != self.positions.len() {
            return Err(MeshError::LengthMismatch {
                what: "texture coordinates",
                expected: self.positions.len(),
                got: tex_coords.len(),
            });
        }
        self.tex_coords = tex_coords;
        Ok(())
    }

    /// Copy the selected precomputed normals into the live buffer and flag it for upload
    pub fn set_active_normal_set(&mut self, kind: NormalSet) {
        let source = match kind {
            NormalSet::Flat => &self.face_normals,
            NormalSet::Smooth => &self.vertex_normals,
        };
        self.normals.copy_from_slice(source);
        self.active = kind;
        self.normals_dirty = true;
        log::debug!("normal set switched to {}", kind);
    }

    /// Hand the live normal buffer to the renderer once after each switch
    pub fn take_normals_update(&mut self) -> Option<Vec<f32>> {
        if !self.normals_dirty {
            return None;
        }
        self.normals_dirty = false;
        Some(self.normal_buffer())
    }

    pub fn active_normal_set(&self) -> NormalSet {
        self.active
    }

    pub fn slot_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn face_normals(&self) -> &[Vector3<f32>] {
        &self.face_normals
    }

    pub fn vertex_normals(&self) -> &[Vector3<f32>] {
        &self.vertex_normals
    }

    /// Normals currently bound for drawing
    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    /// Slot triples, one per triangle
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> {
        (0..self.positions.len() / 3).map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
    }

    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect()
    }

    pub fn color_buffer(&self) -> Vec<f32> {
        self.colors.iter().flatten().copied().collect()
    }

    pub fn tex_coord_buffer(&self) -> Vec<f32> {
        self.tex_coords.iter().flatten().copied().collect()
    }
}
