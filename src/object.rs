//! Scene geometry objects and the object factory registry.
//!
//! An `object <type> ... end` block selects a concrete shape by type name
//! through a registry, exactly like materials. All object types share a
//! couple of common keywords (`name`, `material`) that are checked before
//! each type's own keyword set; `material` accepts either a reference to a
//! named material or a whole nested material block.
//!
//! Groups nest arbitrarily; instances reference a previously named object
//! so heavy geometry is described once and placed many times.

use std::collections::HashMap;
use std::path::PathBuf;

use glam::Vec3;

use crate::material::MaterialId;
use crate::mesh::MeshData;
use crate::parse::{Line, SceneSource};
use crate::scene::Scene;
use crate::tokenize::{next_f32, next_token, next_vec3};

/// Stable handle into the scene's object arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectId(pub(crate) usize);

/// Concrete geometry variants.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    Cylinder {
        base: Vec3,
        radius: f32,
        height: f32,
    },
    Quad {
        corners: [Vec3; 4],
    },
    Triangle {
        vertices: [Vec3; 3],
    },
    /// External OBJ geometry; `data` is filled in by scene preprocessing.
    Mesh {
        file: PathBuf,
        data: Option<MeshData>,
    },
    Group {
        children: Vec<ObjectId>,
    },
    /// Reuse of a previously named object.
    Instance {
        source: Option<ObjectId>,
    },
}

#[derive(Debug, Clone)]
pub struct Object {
    pub name: Option<String>,
    pub material: Option<MaterialId>,
    pub shape: Shape,
}

/// Constructor for one concrete object type. Receives the cursor just past
/// the `object <type>` line and must consume through the block's `end`.
pub type ObjectFactory = fn(&mut SceneSource, &mut Scene) -> Object;

/// Maps object type-name tokens to factories.
pub struct ObjectRegistry {
    factories: HashMap<&'static str, ObjectFactory>,
}

impl ObjectRegistry {
    /// Registry pre-populated with the built-in shapes and their aliases.
    /// Ward triangles are ordinary triangles for our purposes.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("sphere", parse_sphere);
        registry.register("cylinder", parse_cylinder);
        registry.register("quad", parse_quad);
        registry.register("parallelogram", parse_quad);
        registry.register("triangle", parse_triangle);
        registry.register("tri", parse_triangle);
        registry.register("wardtriangle", parse_triangle);
        registry.register("wardtriangles", parse_triangle);
        registry.register("mesh", parse_mesh);
        registry.register("objmesh", parse_mesh);
        registry.register("group", parse_group);
        registry.register("instance", parse_instance);
        registry
    }

    /// Register (or replace) a factory for a type-name token.
    pub fn register(&mut self, type_name: &'static str, factory: ObjectFactory) {
        self.factories.insert(type_name, factory);
    }

    pub fn get(&self, type_name: &str) -> Option<ObjectFactory> {
        self.factories.get(type_name).copied()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }
}

/// Properties common to every object type, checked before the
/// type-specific keywords.
#[derive(Default)]
struct Common {
    name: Option<String>,
    material: Option<MaterialId>,
}

impl Common {
    fn try_keyword(&mut self, line: &Line, src: &mut SceneSource, scene: &mut Scene) -> bool {
        match line.keyword.as_str() {
            "name" => {
                let (tok, _) = next_token(&line.rest);
                if !tok.is_empty() {
                    self.name = Some(tok.to_owned());
                }
                true
            }
            "material" => {
                let (tok, _) = next_token(&line.rest);
                self.material = scene.material_for_reference(tok, src);
                true
            }
            // Per-object trackballs belong to the UI collaborator.
            "trackball" => {
                log::debug!("object trackball request ignored (no window system)");
                true
            }
            _ => false,
        }
    }
}

fn parse_sphere(src: &mut SceneSource, scene: &mut Scene) -> Object {
    let mut common = Common::default();
    let mut center = Vec3::ZERO;
    let mut radius = 1.0;

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        if common.try_keyword(&line, src, scene) {
            continue;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "center" | "pos" | "position" => center = next_vec3(rest).0,
            "radius" => radius = next_f32(rest).0,
            other => src.skip_unknown("sphere", other),
        }
    }

    Object {
        name: common.name,
        material: common.material,
        shape: Shape::Sphere { center, radius },
    }
}

fn parse_cylinder(src: &mut SceneSource, scene: &mut Scene) -> Object {
    let mut common = Common::default();
    let mut base = Vec3::ZERO;
    let mut radius = 1.0;
    let mut height = 1.0;

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        if common.try_keyword(&line, src, scene) {
            continue;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "base" | "pos" | "position" => base = next_vec3(rest).0,
            "radius" => radius = next_f32(rest).0,
            "height" => height = next_f32(rest).0,
            other => src.skip_unknown("cylinder", other),
        }
    }

    Object {
        name: common.name,
        material: common.material,
        shape: Shape::Cylinder {
            base,
            radius,
            height,
        },
    }
}

fn parse_quad(src: &mut SceneSource, scene: &mut Scene) -> Object {
    let mut common = Common::default();
    let mut corners = [Vec3::ZERO; 4];

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        if common.try_keyword(&line, src, scene) {
            continue;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "v0" => corners[0] = next_vec3(rest).0,
            "v1" => corners[1] = next_vec3(rest).0,
            "v2" => corners[2] = next_vec3(rest).0,
            "v3" => corners[3] = next_vec3(rest).0,
            other => src.skip_unknown("quad", other),
        }
    }

    Object {
        name: common.name,
        material: common.material,
        shape: Shape::Quad { corners },
    }
}

fn parse_triangle(src: &mut SceneSource, scene: &mut Scene) -> Object {
    let mut common = Common::default();
    let mut vertices = [Vec3::ZERO; 3];

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        if common.try_keyword(&line, src, scene) {
            continue;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "v0" => vertices[0] = next_vec3(rest).0,
            "v1" => vertices[1] = next_vec3(rest).0,
            "v2" => vertices[2] = next_vec3(rest).0,
            other => src.skip_unknown("triangle", other),
        }
    }

    Object {
        name: common.name,
        material: common.material,
        shape: Shape::Triangle { vertices },
    }
}

fn parse_mesh(src: &mut SceneSource, scene: &mut Scene) -> Object {
    let mut common = Common::default();
    let mut file = PathBuf::new();

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        if common.try_keyword(&line, src, scene) {
            continue;
        }
        let rest = line.rest.as_str();
        match line.keyword.as_str() {
            "file" => {
                let (tok, _) = next_token(rest);
                file = PathBuf::from(tok);
            }
            other => src.skip_unknown("mesh", other),
        }
    }

    if file.as_os_str().is_empty() {
        log::warn!("mesh object declares no file; it will stay empty");
    }

    Object {
        name: common.name,
        material: common.material,
        shape: Shape::Mesh { file, data: None },
    }
}

fn parse_group(src: &mut SceneSource, scene: &mut Scene) -> Object {
    let mut common = Common::default();
    let mut children = Vec::new();

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        if common.try_keyword(&line, src, scene) {
            continue;
        }
        match line.keyword.as_str() {
            "object" => {
                let (tok, _) = next_token(&line.rest);
                if let Some(id) = scene.load_object(&tok.to_ascii_lowercase(), src) {
                    children.push(id);
                }
            }
            other => src.skip_unknown("group", other),
        }
    }

    Object {
        name: common.name,
        material: common.material,
        shape: Shape::Group { children },
    }
}

fn parse_instance(src: &mut SceneSource, scene: &mut Scene) -> Object {
    let mut common = Common::default();
    let mut source = None;

    while let Some(line) = src.next_line() {
        if line.is_end() {
            break;
        }
        if common.try_keyword(&line, src, scene) {
            continue;
        }
        match line.keyword.as_str() {
            "of" | "source" => {
                let (tok, _) = next_token(&line.rest);
                source = scene.find_object(tok);
                if source.is_none() {
                    log::warn!("instance references unknown object '{}'", tok);
                }
            }
            other => src.skip_unknown("instance", other),
        }
    }

    Object {
        name: common.name,
        material: common.material,
        shape: Shape::Instance { source },
    }
}
