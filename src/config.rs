//! Scene configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files:
//! camera placement, projection, light, and render toggles. Every field
//! has a default, so a scene file only names what it changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::RenderError;
use crate::raster::camera::Camera;
use crate::raster::render::{RenderSettings, ShadingMode};
use crate::raster::types::Color;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub light_dir: Vec3,
    pub ambient: f32,
    pub shading: ShadingMode,
    pub backface_cull: bool,
    pub wireframe: bool,
    pub base_color: Color,
    pub background: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let settings = RenderSettings::default();
        Self {
            camera: CameraConfig::default(),
            light_dir: settings.light_dir,
            ambient: settings.ambient,
            shading: settings.shading,
            backface_cull: settings.backface_cull,
            wireframe: settings.wireframe,
            base_color: settings.base_color,
            background: settings.background,
        }
    }
}

impl SceneConfig {
    /// Build the transform pipeline for an output of the given size.
    pub fn build_camera(&self, width: usize, height: usize) -> Camera {
        let mut camera = Camera::new();
        camera.look_at(self.camera.eye, self.camera.center, self.camera.up);
        camera.perspective(
            self.camera.fov_degrees.to_radians(),
            width as f32 / height as f32,
            self.camera.near,
            self.camera.far,
        );
        camera.viewport(0.0, 0.0, width as f32, height as f32);
        camera
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            shading: self.shading,
            backface_cull: self.backface_cull,
            light_dir: self.light_dir.normalize_or_zero(),
            ambient: self.ambient,
            base_color: self.base_color,
            background: self.background,
            wireframe: self.wireframe,
        }
    }
}

/// Load a scene from a RON file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneConfig, RenderError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| RenderError::ConfigIo {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| RenderError::ConfigParse {
        path: path.display().to_string(),
        source,
    })
}

/// Serialize a scene to a RON string (for writing template files).
pub fn scene_to_string(scene: &SceneConfig) -> String {
    let pretty = ron::ser::PrettyConfig::new().indentor("  ".to_string());
    ron::ser::to_string_pretty(scene, pretty).unwrap_or_default()
}
