//! Scene lights.
//!
//! Lights live in an ordered list on the scene; a light's position in that
//! list doubles as its light-unit identifier for the rendering collaborator.
//! The block keyword set follows the classic fixed-function lighting model:
//! a position plus ambient/diffuse/specular colors, spot parameters, and an
//! attenuation triple.

use glam::Vec3;
use serde::Serialize;

use crate::parse::SceneSource;
use crate::tokenize::{next_f32, next_token, next_vec3};

/// A point/spot light.
#[derive(Debug, Clone, Serialize)]
pub struct Light {
    pub name: Option<String>,
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub spot_direction: Vec3,
    pub spot_exponent: f32,
    /// 180 degrees means "not a spotlight".
    pub spot_cutoff: f32,
    /// Constant, linear, quadratic attenuation.
    pub attenuation: [f32; 3],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            name: None,
            position: Vec3::new(0.0, 1.0, 0.0),
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            spot_direction: Vec3::ZERO,
            spot_exponent: 0.0,
            spot_cutoff: 180.0,
            attenuation: [1.0, 0.0, 0.0],
        }
    }
}

impl Light {
    /// Parse a `light ... end` block.
    pub fn from_block(src: &mut SceneSource) -> Light {
        let mut light = Light::default();

        while let Some(line) = src.next_line() {
            if line.is_end() {
                break;
            }
            let rest = line.rest.as_str();
            match line.keyword.as_str() {
                // A single "color" assigns all three terms at once.
                "rgb" | "color" | "spectral" => {
                    let c = next_vec3(rest).0;
                    light.ambient = c;
                    light.diffuse = c;
                    light.specular = c;
                }
                "amb" | "ambient" => light.ambient = next_vec3(rest).0,
                "dif" | "diffuse" => light.diffuse = next_vec3(rest).0,
                "spec" | "specular" => light.specular = next_vec3(rest).0,
                "pos" | "position" => light.position = next_vec3(rest).0,
                "spotdir" => light.spot_direction = next_vec3(rest).0,
                "spotexponent" => light.spot_exponent = next_f32(rest).0,
                "spotcutoff" => light.spot_cutoff = next_f32(rest).0,
                "atten" | "attenuation" => {
                    let a = next_vec3(rest).0;
                    light.attenuation = [a.x, a.y, a.z];
                }
                "name" => {
                    let (tok, _) = next_token(rest);
                    if !tok.is_empty() {
                        light.name = Some(tok.to_owned());
                    }
                }
                "trackball" => log::debug!("light trackball request ignored (no window system)"),
                other => src.skip_unknown("light", other),
            }
        }

        light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_assigns_all_three_terms() {
        let mut src = SceneSource::from_str("rgb 0.5 0.5 1.0\nend\n");
        let light = Light::from_block(&mut src);
        let c = Vec3::new(0.5, 0.5, 1.0);
        assert_eq!(light.ambient, c);
        assert_eq!(light.diffuse, c);
        assert_eq!(light.specular, c);
    }

    #[test]
    fn test_individual_terms_and_position() {
        let text = "\
    pos 3 4 5
    amb 0.1 0.1 0.1
    diffuse 1 1 1
    spec 0.9 0.9 0.9
end
";
        let mut src = SceneSource::from_str(text);
        let light = Light::from_block(&mut src);
        assert_eq!(light.position, Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(light.ambient, Vec3::splat(0.1));
        assert_eq!(light.diffuse, Vec3::ONE);
        assert_eq!(light.specular, Vec3::splat(0.9));
    }

    #[test]
    fn test_name_keeps_case() {
        let mut src = SceneSource::from_str("name KeyLight\nend\n");
        let light = Light::from_block(&mut src);
        assert_eq!(light.name.as_deref(), Some("KeyLight"));
    }

    #[test]
    fn test_defaults() {
        let mut src = SceneSource::from_str("end\n");
        let light = Light::from_block(&mut src);
        assert_eq!(light.spot_cutoff, 180.0);
        assert_eq!(light.attenuation, [1.0, 0.0, 0.0]);
        assert!(light.name.is_none());
    }
}
