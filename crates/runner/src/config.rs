use cubestage_common::Rgba;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Camera placement and horizontal sway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Peak horizontal offset of the camera, in world units.
    pub sway_amplitude: f32,
    /// Seconds per full sway cycle.
    pub sway_period: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 5.0),
            look_at: Vec3::new(0.0, 2.0, 0.0),
            fov_degrees: 75.0,
            near: 1.0,
            far: 100.0,
            sway_amplitude: 0.7,
            sway_period: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub ambient_color: Rgba,
    pub ambient_intensity: f32,
    pub directional_color: Rgba,
    pub directional_intensity: f32,
    pub directional_position: Vec3,
    pub directional_target: Vec3,
    pub cast_shadow: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient_color: Rgba::WHITE,
            ambient_intensity: 0.75,
            directional_color: Rgba::WHITE,
            directional_intensity: 0.4,
            directional_position: Vec3::new(0.0, 10.0, 10.0),
            directional_target: Vec3::ZERO,
            cast_shadow: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub clear_color: Rgba,
    pub shadows: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            clear_color: Rgba::TRANSPARENT,
            shadows: true,
        }
    }
}

/// Everything a runner needs to set up its scene. Every field has a default,
/// so a config file only lists what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub lights: LightConfig,
    pub surface: SurfaceConfig,
    /// Color of the placeholder cube.
    pub cube_color: Rgba,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            lights: LightConfig::default(),
            surface: SurfaceConfig::default(),
            cube_color: Rgba::from_hex(0x00ff00),
        }
    }
}

impl SceneConfig {
    /// Load a config file, picking the parser from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match ext.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        tracing::info!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.sway_period.is_finite() && cam.sway_period > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.sway_period must be positive, got {}",
                cam.sway_period
            )));
        }
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                cam.fov_degrees
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes need 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if self.lights.ambient_intensity < 0.0 || self.lights.directional_intensity < 0.0 {
            return Err(ConfigError::Invalid(
                "light intensities must not be negative".into(),
            ));
        }
        Ok(())
    }
}
