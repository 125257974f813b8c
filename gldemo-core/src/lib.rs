/// gldemo core - geometry and interaction state behind the WebGL coursework demos
///
/// Circle/segment intersection for the sketch demo, flat and smoothed normals
/// for the polyhedron demos, and the input state each demo threads through
/// its event handlers. Nothing here touches a window or a GPU.

pub mod controls;
pub mod error;
pub mod intersect;
pub mod lighting;
pub mod normals;
pub mod polyhedron;
pub mod projection;
pub mod sketch;

// Re-export commonly used types
pub use controls::{Arcball, ArcballMode, Direction, KeyMover, LightingModel, ShadingAction, ShadingControls};
pub use error::{MeshError, Result};
pub use intersect::{intersect, Circle, Intersection, Segment};
pub use lighting::{Light, Material};
pub use normals::{smooth_normals, CoincidenceTable};
pub use polyhedron::{MeshOptions, NormalSet, PolyhedronMesh, Shape};
pub use projection::{Camera, ProjectionMode, ScreenPoint};
pub use sketch::{canvas_to_ndc, Preview, Sketch, SketchEvent, SketchState};
