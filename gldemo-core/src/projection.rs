/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A pixel-space projection of a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// NDC depth in [-1, 1], smaller is closer
    pub depth: f32,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 60f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Fixed look-at view, used when no arcball drives the camera
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Normalized device coordinates of a point seen through `model_view`.
    ///
    /// Returns `None` for points behind the camera or outside the view volume.
    pub fn project_to_ndc(&self, point: &Point3<f32>, model_view: &Matrix4<f32>) -> Option<Point3<f32>> {
        let clip = self.projection_matrix() * model_view * point.to_homogeneous();
        if clip.w.abs() < 1e-6 || (clip.w < 0.0 && self.mode == ProjectionMode::Perspective) {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }
        Some(Point3::from(ndc))
    }

    /// Project a world-space point through `view * model` into pixel space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_view: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let ndc = self.project_to_ndc(point, model_view)?;
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc.y) * 0.5 * height as f32,
            depth: ndc.z,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(700, 700)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_3, epsilon = 1e-6);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(100, 100);
        let p = camera
            .project_to_screen(&Point3::origin(), &camera.view_matrix(), 100, 100)
            .unwrap();
        assert_relative_eq!(p.x, 50.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        let near = camera.project_to_screen(&Point3::new(0.0, 0.0, 1.0), &view, 700, 700).unwrap();
        let far = camera.project_to_screen(&Point3::new(0.0, 0.0, -1.0), &view, 700, 700).unwrap();
        assert!(near.depth < far.depth);
    }

    #[test]
    fn test_orthographic_keeps_size_with_depth() {
        let mut camera = Camera::new(100, 100);
        camera.mode = ProjectionMode::Orthographic;
        let view = camera.view_matrix();
        let near = camera.project_to_screen(&Point3::new(1.0, 0.0, 1.0), &view, 100, 100).unwrap();
        let far = camera.project_to_screen(&Point3::new(1.0, 0.0, -1.0), &view, 100, 100).unwrap();
        assert_relative_eq!(near.x, far.x, epsilon = 1e-4);
        // view volume is 3 units wide
        assert_relative_eq!(near.x, 50.0 + 100.0 / 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ndc_of_origin_is_centre() {
        let camera = Camera::default();
        let ndc = camera.project_to_ndc(&Point3::origin(), &camera.view_matrix()).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::default();
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(camera.project_to_screen(&behind, &camera.view_matrix(), 700, 700).is_none());
    }
}
