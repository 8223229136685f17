//! Scene camera.
//!
//! A scene has exactly one camera. The camera block also carries the output
//! resolution (`width`/`height`/`res`), which belongs to the scene rather
//! than the camera, so parsing returns both.
//!
//! The view/projection accessors are what the rendering collaborator
//! consumes; nothing here touches a graphics API.

use glam::{Mat4, Vec3};
use serde::Serialize;

use crate::parse::SceneSource;
use crate::tokenize::{next_f32, next_token, next_vec3, parse_f32};

/// Output image size declared in the camera block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

/// A pinhole perspective camera.
#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 1.0),
            at: Vec3::ZERO,
            up: Vec3::new(0.0, 1.0, 0.0),
            fovy: 90.0,
            near: 0.1,
            far: 20.0,
        }
    }
}

impl Camera {
    /// Parse a `camera pinhole ... end` block. Starts from defaults so a
    /// defective scene file still yields a usable camera.
    pub fn from_block(src: &mut SceneSource) -> (Camera, ScreenSize) {
        let mut cam = Camera::default();
        let mut size = ScreenSize::default();

        while let Some(line) = src.next_line() {
            if line.is_end() {
                break;
            }
            let rest = line.rest.as_str();
            match line.keyword.as_str() {
                "eye" => cam.eye = next_vec3(rest).0,
                "at" => cam.at = next_vec3(rest).0,
                "up" => cam.up = next_vec3(rest).0,
                "fovy" => cam.fovy = next_f32(rest).0,
                "near" => cam.near = next_f32(rest).0,
                "far" => cam.far = next_f32(rest).0,
                "w" | "width" => size.width = next_f32(rest).0 as u32,
                "h" | "height" => size.height = next_f32(rest).0 as u32,
                "res" | "resolution" => {
                    let (w, rest) = next_token(rest);
                    let (h, _) = next_token(rest);
                    size.width = parse_f32(w) as u32;
                    size.height = parse_f32(h) as u32;
                }
                // Trackball manipulation lives in the UI collaborator.
                "trackball" => log::debug!("camera trackball request ignored (no window system)"),
                other => src.skip_unknown("camera", other),
            }
        }

        (cam, size)
    }

    /// View matrix (right-handed look-at).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.at, self.up)
    }

    /// Perspective projection matrix for the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy.to_radians(), aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_block() {
        let text = "\
    eye 0 3 10
    at 0 0 0
    up 0 1 0
    fovy 45
    near 0.5
    far 100
    res 800 600
end
";
        let mut src = SceneSource::from_str(text);
        let (cam, size) = Camera::from_block(&mut src);

        assert_eq!(cam.eye, Vec3::new(0.0, 3.0, 10.0));
        assert_eq!(cam.fovy, 45.0);
        assert_eq!(cam.near, 0.5);
        assert_eq!(cam.far, 100.0);
        assert_eq!(size, ScreenSize { width: 800, height: 600 });
    }

    #[test]
    fn test_defaults_survive_empty_block() {
        let mut src = SceneSource::from_str("end\n");
        let (cam, size) = Camera::from_block(&mut src);
        assert_eq!(cam.fovy, 90.0);
        assert_eq!(cam.eye, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(size, ScreenSize::default());
    }

    #[test]
    fn test_width_height_aliases() {
        let mut src = SceneSource::from_str("w 1024\nh 768\nend\n");
        let (_, size) = Camera::from_block(&mut src);
        assert_eq!(size, ScreenSize { width: 1024, height: 768 });
    }

    #[test]
    fn test_unknown_keyword_does_not_derail_block() {
        let mut src = SceneSource::from_str("aperture 2.8\nfovy 30\nend\n");
        let (cam, _) = Camera::from_block(&mut src);
        assert_eq!(cam.fovy, 30.0);
    }

    #[test]
    fn test_view_matrix_faces_target() {
        let cam = Camera {
            eye: Vec3::new(0.0, 0.0, 5.0),
            ..Camera::default()
        };
        let origin_in_view = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(origin_in_view.z < 0.0);
    }
}
