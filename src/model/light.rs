use glam::Vec3;

/// Distance falloff: 1 / (constant + linear * d + quadratic * d^2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub enabled: bool,
    pub direction: Vec3,
    pub color: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: Vec3::new(-0.2, -1.0, -0.3),
            color: Vec3::ONE,
        }
    }
}

/// Parameters shared by every positioned point light in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub enabled: bool,
    pub color: Vec3,
    pub attenuation: Attenuation,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Vec3::ONE,
            attenuation: Attenuation::default(),
        }
    }
}

/// Flashlight attached to the camera. Cut-offs are half-angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub enabled: bool,
    pub color: Vec3,
    pub inner_cutoff_deg: f32,
    pub outer_cutoff_deg: f32,
    pub attenuation: Attenuation,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Vec3::ONE,
            inner_cutoff_deg: 12.5,
            outer_cutoff_deg: 17.5,
            attenuation: Attenuation::default(),
        }
    }
}

/// Ambient, diffuse and specular terms as uploaded to the shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTerms {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightTerms {
    pub const ZERO: Self = Self {
        ambient: Vec3::ZERO,
        diffuse: Vec3::ZERO,
        specular: Vec3::ZERO,
    };

    /// Terms for a light of `color`; the scene background doubles as ambient.
    /// A disabled light contributes nothing.
    pub fn new(enabled: bool, color: Vec3, ambient: Vec3) -> Self {
        if enabled {
            Self {
                ambient,
                diffuse: color,
                specular: color,
            }
        } else {
            Self::ZERO
        }
    }
}

/// All light parameters the inspector can edit, plus the background colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSettings {
    pub clear_color: Vec3,
    pub directional: DirectionalLight,
    pub point: PointLight,
    pub spot: SpotLight,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            clear_color: Vec3::splat(0.05),
            directional: DirectionalLight::default(),
            point: PointLight::default(),
            spot: SpotLight::default(),
        }
    }
}

impl LightSettings {
    pub fn directional_terms(&self) -> LightTerms {
        LightTerms::new(self.directional.enabled, self.directional.color, self.clear_color)
    }

    pub fn point_terms(&self) -> LightTerms {
        LightTerms::new(self.point.enabled, self.point.color, self.clear_color)
    }

    pub fn spot_terms(&self) -> LightTerms {
        LightTerms::new(self.spot.enabled, self.spot.color, self.clear_color)
    }

    /// Colour of the bulb meshes: the point colour when lit, dim grey otherwise.
    pub fn lamp_color(&self) -> Vec3 {
        if self.point.enabled {
            self.point.color
        } else {
            Vec3::splat(0.1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let lights = LightSettings::default();
        assert_eq!(lights.clear_color, Vec3::splat(0.05));
        assert_eq!(lights.spot.inner_cutoff_deg, 12.5);
        assert_eq!(lights.spot.outer_cutoff_deg, 17.5);
        assert_eq!(lights.point.attenuation.linear, 0.09);
        assert_eq!(lights.point.attenuation.quadratic, 0.032);
        assert_eq!(lights.directional.direction, Vec3::new(-0.2, -1.0, -0.3));
    }

    #[test]
    fn test_disabled_light_has_zero_terms() {
        let mut lights = LightSettings::default();
        lights.point.enabled = false;
        assert_eq!(lights.point_terms(), LightTerms::ZERO);
        assert_eq!(lights.directional_terms().ambient, lights.clear_color);
    }

    #[test]
    fn test_lamp_color_dims_when_disabled() {
        let mut lights = LightSettings::default();
        lights.point.color = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(lights.lamp_color(), Vec3::new(1.0, 0.0, 0.0));
        lights.point.enabled = false;
        assert_eq!(lights.lamp_color(), Vec3::splat(0.1));
    }
}
