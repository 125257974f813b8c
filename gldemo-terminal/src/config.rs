//! Demo configuration
//!
//! Sources, lowest priority first:
//! 1. `config/default.toml`
//! 2. `config/user.toml` (local overrides, not checked in)
//! 3. Environment variables (`GLDEMO_SECTION__KEY`)

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use gldemo_core::{Arcball, Light, Material, MeshError, MeshOptions, Shape};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] figment::Error),

    #[error("configuration error: {0}")]
    Shape(#[from] MeshError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sketch: SketchConfig,
    #[serde(default)]
    pub solid: SolidConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub arcball: ArcballConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl AppConfig {
    /// Load from `config/` relative to the working directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();
        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }
        // GLDEMO_SOLID__SHAPE=octahedron -> solid.shape = "octahedron"
        figment = figment.merge(Env::prefixed("GLDEMO_").split("__"));

        let config: AppConfig = figment.extract()?;
        config.solid.shape()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Line-loop resolution of the circle outline
    pub circle_segments: usize,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            circle_segments: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidConfig {
    /// `pyramid` or `octahedron`
    pub shape: String,
    /// Uniform RGBA override for every face
    pub color: Option<[f32; 4]>,
    /// Idle spin about the y axis, radians per frame
    pub rotation_speed: f32,
}

impl SolidConfig {
    pub fn shape(&self) -> Result<Shape, MeshError> {
        self.shape.parse()
    }

    pub fn mesh_options(&self) -> MeshOptions {
        MeshOptions { color: self.color }
    }
}

impl Default for SolidConfig {
    fn default() -> Self {
        Self {
            shape: "pyramid".to_string(),
            color: None,
            rotation_speed: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub material_diffuse: [f32; 3],
    pub material_specular: f32,
    pub shininess: f32,
}

impl LightConfig {
    pub fn light(&self) -> Light {
        Light {
            position: Point3::from(self.position),
            ambient: Vector3::repeat(self.ambient),
            diffuse: Vector3::repeat(self.diffuse),
            specular: Vector3::repeat(self.specular),
        }
    }

    pub fn material(&self) -> Material {
        Material {
            diffuse: Vector3::from(self.material_diffuse),
            specular: Vector3::repeat(self.material_specular),
            shininess: self.shininess,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [1.0, 0.7, 1.0],
            ambient: 0.2,
            diffuse: 0.7,
            specular: 1.0,
            material_diffuse: [1.0, 0.5, 0.31],
            material_specular: 0.5,
            shininess: 16.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcballConfig {
    pub distance: f32,
    pub rotation_sensitivity: f32,
    pub zoom_sensitivity: f32,
}

impl ArcballConfig {
    pub fn arcball(&self) -> Arcball {
        Arcball::new(self.distance, self.rotation_sensitivity, self.zoom_sensitivity)
    }
}

impl Default for ArcballConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            rotation_sensitivity: 2.0,
            zoom_sensitivity: 0.0005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub target_fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { target_fps: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.sketch.circle_segments, 100);
        assert_eq!(config.solid.shape().unwrap(), Shape::Pyramid);
        assert_eq!(config.render.target_fps, 30);
        assert_eq!(config.light.light(), Light::default());
        assert_eq!(config.light.material(), Material::default());
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let solid = SolidConfig {
            shape: "torus".to_string(),
            ..SolidConfig::default()
        };
        assert!(solid.shape().is_err());
    }

    #[test]
    fn test_color_override_flows_into_mesh_options() {
        let solid = SolidConfig {
            color: Some([0.1, 0.2, 0.3, 1.0]),
            ..SolidConfig::default()
        };
        assert_eq!(solid.mesh_options(), MeshOptions::with_color([0.1, 0.2, 0.3, 1.0]));
    }
}
