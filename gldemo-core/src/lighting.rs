/// Phong reflection shared by the Phong and Gouraud paths
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Point3::new(1.0, 0.7, 1.0),
            ambient: Vector3::repeat(0.2),
            diffuse: Vector3::repeat(0.7),
            specular: Vector3::repeat(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vector3::new(1.0, 0.5, 0.31),
            specular: Vector3::repeat(0.5),
            shininess: 16.0,
        }
    }
}

/// Evaluate the Phong model at a surface point.
///
/// `normal` need not be unit length; averaged vertex normals are renormalized here.
pub fn shade(
    light: &Light,
    material: &Material,
    position: &Point3<f32>,
    normal: &Vector3<f32>,
    view_position: &Point3<f32>,
) -> Vector3<f32> {
    let n = normal.try_normalize(1e-8).unwrap_or_else(Vector3::zeros);
    let to_light = (light.position - position).normalize();
    let to_view = (view_position - position).normalize();

    let ambient = light.ambient.component_mul(&material.diffuse);

    let diff = n.dot(&to_light).max(0.0);
    let diffuse = light.diffuse.component_mul(&material.diffuse) * diff;

    // No highlight on faces turned away from the light
    let spec = if diff > 0.0 {
        let reflected = -to_light - n * 2.0 * n.dot(&-to_light);
        reflected.dot(&to_view).max(0.0).powf(material.shininess)
    } else {
        0.0
    };
    let specular = light.specular.component_mul(&material.specular) * spec;

    ambient + diffuse + specular
}

/// Perceived brightness of a linear RGB color, clamped to [0, 1]
pub fn luminance(color: &Vector3<f32>) -> f32 {
    (0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z).clamp(0.0, 1.0)
}
