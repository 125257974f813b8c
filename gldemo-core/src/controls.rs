/// Keyboard and pointer controls shared by the demos
use std::fmt;

use nalgebra::{Matrix4, Point2, UnitQuaternion, Vector2, Vector3};

use crate::polyhedron::NormalSet;

/// Arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn unit(self) -> Vector2<f32> {
        match self {
            Direction::Up => Vector2::new(0.0, 1.0),
            Direction::Down => Vector2::new(0.0, -1.0),
            Direction::Left => Vector2::new(-1.0, 0.0),
            Direction::Right => Vector2::new(1.0, 0.0),
        }
    }
}

/// Moves a square around the viewport while arrow keys are held.
///
/// Only the most recently pressed key that is still held has any effect.
#[derive(Debug, Clone)]
pub struct KeyMover {
    held: Vec<Direction>,
    displacement: Vector2<f32>,
    speed: f32,
    limit: f32,
}

impl KeyMover {
    pub const DEFAULT_SPEED: f32 = 0.01;
    pub const DEFAULT_LIMIT: f32 = 0.9;

    pub fn new(speed: f32, limit: f32) -> Self {
        Self {
            held: Vec::new(),
            displacement: Vector2::zeros(),
            speed,
            limit,
        }
    }

    pub fn key_down(&mut self, direction: Direction) {
        if !self.held.contains(&direction) {
            self.held.push(direction);
        }
    }

    pub fn key_up(&mut self, direction: Direction) {
        self.held.retain(|&d| d != direction);
    }

    /// Advance one frame and return the clamped displacement
    pub fn step(&mut self) -> Vector2<f32> {
        if let Some(&direction) = self.held.last() {
            self.displacement += direction.unit() * self.speed;
        }
        self.displacement.x = self.displacement.x.clamp(-self.limit, self.limit);
        self.displacement.y = self.displacement.y.clamp(-self.limit, self.limit);
        self.displacement
    }

    pub fn displacement(&self) -> Vector2<f32> {
        self.displacement
    }
}

impl Default for KeyMover {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED, Self::DEFAULT_LIMIT)
    }
}

/// What the arcball drag rotates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcballMode {
    #[default]
    Camera,
    Model,
}

impl fmt::Display for ArcballMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcballMode::Camera => write!(f, "CAMERA"),
            ArcballMode::Model => write!(f, "MODEL"),
        }
    }
}

/// Lighting evaluated per vertex or per fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingModel {
    #[default]
    Phong,
    Gouraud,
}

impl fmt::Display for LightingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightingModel::Phong => write!(f, "PHONG"),
            LightingModel::Gouraud => write!(f, "GOURAUD"),
        }
    }
}

/// Side effect requested by a handled key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingAction {
    ArcballMode(ArcballMode),
    ResetView,
    NormalSet(NormalSet),
    Lighting(LightingModel),
}

/// Key bindings of the lighting demo
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadingControls {
    pub arcball_mode: ArcballMode,
    pub normal_set: NormalSet,
    pub lighting: LightingModel,
}

impl ShadingControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key press; unbound keys return `None`
    pub fn handle_key(&mut self, key: char) -> Option<ShadingAction> {
        let action = match key {
            'a' => {
                self.arcball_mode = match self.arcball_mode {
                    ArcballMode::Camera => ArcballMode::Model,
                    ArcballMode::Model => ArcballMode::Camera,
                };
                ShadingAction::ArcballMode(self.arcball_mode)
            }
            'r' => {
                self.arcball_mode = ArcballMode::Camera;
                ShadingAction::ResetView
            }
            's' => {
                self.normal_set = NormalSet::Smooth;
                ShadingAction::NormalSet(NormalSet::Smooth)
            }
            'f' => {
                self.normal_set = NormalSet::Flat;
                ShadingAction::NormalSet(NormalSet::Flat)
            }
            'g' => {
                self.lighting = LightingModel::Gouraud;
                ShadingAction::Lighting(LightingModel::Gouraud)
            }
            'p' => {
                self.lighting = LightingModel::Phong;
                ShadingAction::Lighting(LightingModel::Phong)
            }
            _ => return None,
        };
        log::info!("{}", self.status_line());
        Some(action)
    }

    pub fn status_line(&self) -> String {
        format!("shading mode: {} ({})", self.normal_set, self.lighting)
    }

    pub fn arcball_line(&self) -> String {
        format!("arcball mode: {}", self.arcball_mode)
    }

    pub fn help_lines() -> [&'static str; 6] {
        [
            "press 'a' to change arcball mode",
            "press 'r' to reset arcball",
            "press 's' to switch to smooth shading",
            "press 'f' to switch to flat shading",
            "press 'g' to switch to Gouraud shading",
            "press 'p' to switch to Phong shading",
        ]
    }
}

/// Virtual trackball turning pointer drags into rotations
#[derive(Debug, Clone)]
pub struct Arcball {
    rotation: UnitQuaternion<f32>,
    drag_origin: Option<Vector3<f32>>,
    distance: f32,
    initial_distance: f32,
    rotation_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl Arcball {
    const MIN_DISTANCE: f32 = 0.5;

    pub fn new(distance: f32, rotation_sensitivity: f32, zoom_sensitivity: f32) -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            drag_origin: None,
            distance,
            initial_distance: distance,
            rotation_sensitivity,
            zoom_sensitivity,
        }
    }

    /// Project an NDC point onto the unit hemisphere facing the viewer
    fn project(point: Point2<f32>) -> Vector3<f32> {
        let d2 = point.x * point.x + point.y * point.y;
        if d2 <= 1.0 {
            Vector3::new(point.x, point.y, (1.0 - d2).sqrt())
        } else {
            Vector3::new(point.x, point.y, 0.0).normalize()
        }
    }

    pub fn begin_drag(&mut self, point: Point2<f32>) {
        self.drag_origin = Some(Self::project(point));
    }

    pub fn drag_to(&mut self, point: Point2<f32>) {
        let Some(from) = self.drag_origin else {
            return;
        };
        let to = Self::project(point);
        if let Some(delta) = UnitQuaternion::rotation_between(&from, &to) {
            let scaled = delta.powf(self.rotation_sensitivity);
            self.rotation = scaled * self.rotation;
        }
        self.drag_origin = Some(to);
    }

    pub fn end_drag(&mut self) {
        self.drag_origin = None;
    }

    pub fn zoom(&mut self, wheel_delta: f32) {
        self.distance = (self.distance + wheel_delta * self.zoom_sensitivity).max(Self::MIN_DISTANCE);
    }

    pub fn reset(&mut self) {
        self.rotation = UnitQuaternion::identity();
        self.drag_origin = None;
        self.distance = self.initial_distance;
    }

    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    /// Camera orbiting the origin: pull back, then rotate the world
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera_distance_matrix() * self.rotation.to_homogeneous()
    }

    pub fn model_rotation_matrix(&self) -> Matrix4<f32> {
        self.rotation.to_homogeneous()
    }

    pub fn camera_distance_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(0.0, 0.0, -self.distance))
    }
}

impl Default for Arcball {
    fn default() -> Self {
        Self::new(5.0, 2.0, 0.0005)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_latest_held_key_wins() {
        let mut mover = KeyMover::default();
        mover.key_down(Direction::Right);
        mover.key_down(Direction::Up);
        mover.key_down(Direction::Right);
        let d = mover.step();
        assert_relative_eq!(d, Vector2::new(0.0, 0.01), epsilon = 1e-6);

        mover.key_up(Direction::Up);
        let d = mover.step();
        assert_relative_eq!(d, Vector2::new(0.01, 0.01), epsilon = 1e-6);
    }

    #[test]
    fn test_displacement_clamped() {
        let mut mover = KeyMover::default();
        mover.key_down(Direction::Left);
        for _ in 0..500 {
            mover.step();
        }
        assert_relative_eq!(mover.displacement().x, -0.9);
        mover.key_up(Direction::Left);
        assert_relative_eq!(mover.step().x, -0.9);
    }

    #[test]
    fn test_shading_keys() {
        let mut controls = ShadingControls::new();
        assert_eq!(controls.status_line(), "shading mode: FLAT (PHONG)");

        assert_eq!(
            controls.handle_key('s'),
            Some(ShadingAction::NormalSet(NormalSet::Smooth))
        );
        assert_eq!(
            controls.handle_key('g'),
            Some(ShadingAction::Lighting(LightingModel::Gouraud))
        );
        assert_eq!(controls.status_line(), "shading mode: SMOOTH (GOURAUD)");

        assert_eq!(
            controls.handle_key('a'),
            Some(ShadingAction::ArcballMode(ArcballMode::Model))
        );
        assert_eq!(controls.arcball_line(), "arcball mode: MODEL");
        assert_eq!(controls.handle_key('r'), Some(ShadingAction::ResetView));
        assert_eq!(controls.arcball_mode, ArcballMode::Camera);
        assert_eq!(controls.handle_key('x'), None);
    }

    #[test]
    fn test_arcball_drag_rotates_and_reset_restores() {
        let mut arcball = Arcball::new(5.0, 1.0, 0.001);
        arcball.begin_drag(Point2::new(0.0, 0.0));
        arcball.drag_to(Point2::new(0.5, 0.0));
        arcball.end_drag();
        assert!(arcball.rotation().angle() > 0.1);
        // Dragging right spins about +y
        let axis = arcball.rotation().axis().unwrap();
        assert_relative_eq!(axis.into_inner(), Vector3::y(), epsilon = 1e-5);

        arcball.zoom(-10_000.0);
        let view = arcball.view_matrix();
        assert_relative_eq!(view[(2, 3)], -Arcball::MIN_DISTANCE);

        arcball.reset();
        assert_relative_eq!(arcball.view_matrix(), arcball.camera_distance_matrix());
        assert_relative_eq!(arcball.camera_distance_matrix()[(2, 3)], -5.0);
    }

    #[test]
    fn test_drag_without_begin_is_ignored() {
        let mut arcball = Arcball::default();
        arcball.drag_to(Point2::new(0.3, 0.3));
        assert_relative_eq!(arcball.rotation().angle(), 0.0);
    }
}
