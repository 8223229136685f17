//! Material models and the material factory registry.
//!
//! A `material <type> ... end` block selects one of several shading models
//! by type name. The registry maps type-name tokens to factory functions,
//! so programs can register their own material types without touching the
//! dispatcher. Each factory runs the block-parsing loop for its own keyword
//! set; unknown keywords fall to the shared recovery path.

use std::collections::HashMap;

use glam::Vec3;

use crate::parse::SceneSource;
use crate::scene::Scene;
use crate::shader::{Shader, ShaderId};
use crate::texture::TextureId;
use crate::tokenize::{next_f32, next_token, next_vec3};

/// Stable handle into the scene's material arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialId(pub(crate) usize);

/// The concrete shading models a scene file can ask for.
#[derive(Debug, Clone)]
pub enum MaterialModel {
    /// Full ambient/diffuse/specular model with a shininess exponent.
    Standard {
        ambient: Vec3,
        diffuse: Vec3,
        specular: Vec3,
        emissive: Vec3,
        shininess: f32,
    },
    /// Diffuse-only, optionally textured.
    Lambertian {
        diffuse: Vec3,
        texture: Option<TextureId>,
    },
    /// Flat unlit color.
    Constant { color: Vec3 },
    /// Shading delegated to a shader program.
    ShaderBacked { shader: Option<ShaderId> },
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: Option<String>,
    pub model: MaterialModel,
}

impl Material {
    /// The material used when an object names none: a plain gray standard
    /// model, matching slot 0 of the scene's material list.
    pub fn fallback() -> Self {
        Self {
            name: Some("default".to_owned()),
            model: MaterialModel::Standard {
                ambient: Vec3::splat(0.2),
                diffuse: Vec3::splat(0.8),
                specular: Vec3::ZERO,
                emissive: Vec3::ZERO,
                shininess: 0.0,
            },
        }
    }
}

/// Constructor for one concrete material type. Receives the cursor just
/// past the `material <type>` line and must consume through the block's
/// `end`.
pub type MaterialFactory = fn(&mut SceneSource, &mut Scene) -> Material;

/// Maps material type-name tokens to factories.
pub struct MaterialRegistry {
    factories: HashMap<&'static str, MaterialFactory>,
}

impl MaterialRegistry {
    /// Registry pre-populated with the built-in material types and their
    /// historical aliases.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("standard", parse_standard);
        registry.register("glmaterial", parse_standard);
        registry.register("phong", parse_standard);
        registry.register("lambertian", parse_lambertian);
        registry.register("gllambertian", parse_lambertian);
        registry.register("lambertiantex", parse_lambertian);
        registry.register("gllambertiantex", parse_lambertian);
        registry.register("constant", parse_constant);
        registry.register("glconstant", parse_constant);
        registry.register("shader", parse_shader_backed);
        registry.register("glslshader", parse_shader_backed);
        registry
    }

    /// Register (or replace) a factory for a type-name token.
    pub fn register(&mut self, type_name: &'static str, factory: MaterialFactory) {
        self.factories.insert(type_name, factory);
    }

    pub fn get(&self, type_name: &str) -> Option<MaterialFactory> {
        self.factories.get(type_name).copied()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }
}

/// Read a `name` line's value, keeping its case.
fn name_token(rest: &str) -> Option<String> {
    let (tok, _) = next_token(rest);
    (!tok.is_empty()).then(|| tok.to_owned())
}

fn parse_standard(src: &mut SceneSource, _scene: &mut Scene) -> Material {
    let mut name = None;
    let mut ambient = Vec3::ZERO;
    let mut diffuse = Vec3::splat(0.8);
    let mut specular = Vec3::ZERO;
    let mut emissive = Vec3::ZERO;
    let mut shininess = 0.0;

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "name" => name = name_token(rest),
            "amb" | "ambient" => ambient = next_vec3(rest).0,
            "dif" | "diffuse" => diffuse = next_vec3(rest).0,
            "spec" | "specular" => specular = next_vec3(rest).0,
            "emit" | "emissive" => emissive = next_vec3(rest).0,
            "shiny" | "shininess" => shininess = next_f32(rest).0,
            other => src.skip_unknown("standard material", other),
        }
    }

    Material {
        name,
        model: MaterialModel::Standard {
            ambient,
            diffuse,
            specular,
            emissive,
            shininess,
        },
    }
}

fn parse_lambertian(src: &mut SceneSource, scene: &mut Scene) -> Material {
    let mut name = None;
    let mut diffuse = Vec3::splat(0.8);
    let mut texture = None;

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "name" => name = name_token(rest),
            "dif" | "diffuse" | "albedo" => diffuse = next_vec3(rest).0,
            "tex" | "texture" => {
                let (file, _) = next_token(rest);
                if !file.is_empty() {
                    texture = Some(scene.texture_for_file(file));
                }
            }
            other => src.skip_unknown("lambertian material", other),
        }
    }

    Material {
        name,
        model: MaterialModel::Lambertian { diffuse, texture },
    }
}

fn parse_constant(src: &mut SceneSource, _scene: &mut Scene) -> Material {
    let mut name = None;
    let mut color = Vec3::ONE;

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "name" => name = name_token(rest),
            "color" | "rgb" => color = next_vec3(rest).0,
            other => src.skip_unknown("constant material", other),
        }
    }

    Material {
        name,
        model: MaterialModel::Constant { color },
    }
}

fn parse_shader_backed(src: &mut SceneSource, scene: &mut Scene) -> Material {
    let mut name = None;
    let mut shader: Option<ShaderId> = None;
    let mut inline = Shader::default();

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "name" => name = name_token(rest),
            // Reference to a shader block declared earlier in the file.
            "shader" => {
                let (tok, _) = next_token(rest);
                shader = scene.find_shader(tok);
                if shader.is_none() {
                    log::warn!("shader material references unknown shader '{}'", tok);
                }
            }
            "vert" | "vertex" => {
                let (tok, _) = next_token(rest);
                if !tok.is_empty() {
                    inline.vertex = Some(tok.into());
                }
            }
            "frag" | "fragment" => {
                let (tok, _) = next_token(rest);
                if !tok.is_empty() {
                    inline.fragment = Some(tok.into());
                }
            }
            other => src.skip_unknown("shader material", other),
        }
    }

    // Inline vertex/fragment lines build an anonymous shader entity so the
    // reload pass still sees it.
    if shader.is_none() && (inline.vertex.is_some() || inline.fragment.is_some()) {
        shader = Some(scene.add_shader(inline));
    }

    Material {
        name,
        model: MaterialModel::ShaderBacked { shader },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_knows_builtins_and_aliases() {
        let registry = MaterialRegistry::with_builtins();
        assert!(registry.contains("lambertian"));
        assert!(registry.contains("glmaterial"));
        assert!(registry.contains("constant"));
        assert!(registry.contains("glslshader"));
        assert!(!registry.contains("velvet"));
    }

    #[test]
    fn test_parse_standard_block() {
        let text = "\
    name Brass
    amb 0.3 0.2 0.1
    dif 0.8 0.6 0.2
    spec 0.9 0.9 0.9
    shiny 40
end
";
        let mut scene = Scene::new();
        let mut src = SceneSource::from_str(text);
        let mat = parse_standard(&mut src, &mut scene);

        assert_eq!(mat.name.as_deref(), Some("Brass"));
        match mat.model {
            MaterialModel::Standard {
                diffuse, shininess, ..
            } => {
                assert_eq!(diffuse, Vec3::new(0.8, 0.6, 0.2));
                assert_eq!(shininess, 40.0);
            }
            _ => panic!("expected standard model"),
        }
    }

    #[test]
    fn test_parse_lambertian_with_texture() {
        let mut scene = Scene::new();
        let mut src = SceneSource::from_str("dif 1 0 0\ntex bricks.ppm\nend\n");
        let mat = parse_lambertian(&mut src, &mut scene);

        match mat.model {
            MaterialModel::Lambertian { diffuse, texture } => {
                assert_eq!(diffuse, Vec3::new(1.0, 0.0, 0.0));
                assert!(texture.is_some());
            }
            _ => panic!("expected lambertian model"),
        }
    }

    #[test]
    fn test_lambertian_texture_dedup_by_file() {
        let mut scene = Scene::new();
        let mut src = SceneSource::from_str("tex bricks.ppm\nend\ntex bricks.ppm\nend\n");
        let a = parse_lambertian(&mut src, &mut scene);
        let b = parse_lambertian(&mut src, &mut scene);

        let (MaterialModel::Lambertian { texture: ta, .. }, MaterialModel::Lambertian { texture: tb, .. }) =
            (a.model, b.model)
        else {
            panic!("expected lambertian models");
        };
        assert_eq!(ta.unwrap(), tb.unwrap());
    }

    #[test]
    fn test_shader_material_builds_inline_shader() {
        let mut scene = Scene::new();
        let mut src = SceneSource::from_str("vertex glow.vert\nfragment glow.frag\nend\n");
        let mat = parse_shader_backed(&mut src, &mut scene);

        match mat.model {
            MaterialModel::ShaderBacked { shader } => assert!(shader.is_some()),
            _ => panic!("expected shader-backed model"),
        }
    }

    #[test]
    fn test_unknown_keyword_inside_material_recovers() {
        let mut scene = Scene::new();
        let mut src = SceneSource::from_str("sheen 0.4\ncolor 0 1 0\nend\n");
        let mat = parse_constant(&mut src, &mut scene);
        match mat.model {
            MaterialModel::Constant { color } => assert_eq!(color, Vec3::new(0.0, 1.0, 0.0)),
            _ => panic!("expected constant model"),
        }
    }
}
