use cubestage_common::Rgba;
use glam::Vec3;

/// Uniform light applied to every surface regardless of orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgba,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            intensity: 0.0,
        }
    }
}

/// Light travelling from `position` towards `target`, parallel everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgba,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            intensity: 0.0,
            position: Vec3::Y,
            target: Vec3::ZERO,
            cast_shadow: false,
        }
    }
}

impl DirectionalLight {
    /// Unit vector pointing from the lit surface back towards the light.
    pub fn to_light(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_light_points_at_source() {
        let light = DirectionalLight {
            position: Vec3::new(0.0, 10.0, 10.0),
            ..DirectionalLight::default()
        };
        let dir = light.to_light();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.y > 0.0 && dir.z > 0.0);
    }

    #[test]
    fn degenerate_light_falls_back_to_up() {
        let light = DirectionalLight {
            position: Vec3::ZERO,
            ..DirectionalLight::default()
        };
        assert_eq!(light.to_light(), Vec3::Y);
    }
}
