//! The scene aggregate and its top-level parse loop.
//!
//! A `Scene` owns everything a scene file can declare: the camera, lights in
//! declaration order, geometry, and arenas of materials, textures, shaders,
//! and objects. Named entities are additionally indexed by name so later
//! lines can reference them; re-declaring a name repoints the index at the
//! new entity while the old one stays alive in its arena, keeping
//! previously handed-out ids valid.
//!
//! Loading is two phases. `load_file` parses the text and builds the
//! structure; `preprocess` then pulls in external resources (OBJ meshes)
//! that parsing only recorded by filename. Only an unopenable file or a
//! missing camera fails the load; everything else degrades with a warning,
//! so one bad block does not take down the whole scene.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;

use crate::camera::{Camera, ScreenSize};
use crate::light::Light;
use crate::material::{Material, MaterialId, MaterialRegistry};
use crate::mesh::MeshData;
use crate::object::{Object, ObjectId, ObjectRegistry, Shape};
use crate::parse::SceneSource;
use crate::paths::SearchPaths;
use crate::shader::{Shader, ShaderId};
use crate::texture::{Texture, TextureId};
use crate::tokenize::{next_token, parse_bool, parse_f32, parse_i32};
use crate::variables::VariableStore;

pub struct Scene {
    camera: Camera,
    screen: ScreenSize,
    has_camera: bool,
    lights: Vec<Light>,

    /// Top-level objects, in declaration order.
    geometry: Vec<ObjectId>,

    materials: Vec<Material>,
    material_names: HashMap<String, MaterialId>,
    objects: Vec<Object>,
    object_names: HashMap<String, ObjectId>,
    textures: Vec<Texture>,
    texture_names: HashMap<String, TextureId>,
    texture_files: HashMap<PathBuf, TextureId>,
    shaders: Vec<Shader>,
    shader_names: HashMap<String, ShaderId>,

    variables: VariableStore,
    paths: SearchPaths,

    material_registry: MaterialRegistry,
    object_registry: ObjectRegistry,
}

impl Scene {
    /// An empty scene with the built-in registries and the default material
    /// installed at arena slot 0.
    pub fn new() -> Self {
        Self {
            camera: Camera::default(),
            screen: ScreenSize::default(),
            has_camera: false,
            lights: Vec::new(),
            geometry: Vec::new(),
            materials: vec![Material::fallback()],
            material_names: HashMap::new(),
            objects: Vec::new(),
            object_names: HashMap::new(),
            textures: Vec::new(),
            texture_names: HashMap::new(),
            texture_files: HashMap::new(),
            shaders: Vec::new(),
            shader_names: HashMap::new(),
            variables: VariableStore::new(),
            paths: SearchPaths::new(),
            material_registry: MaterialRegistry::with_builtins(),
            object_registry: ObjectRegistry::with_builtins(),
        }
    }

    /// Parse a scene file from disk.
    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let mut src = SceneSource::open(path)
            .with_context(|| format!("loading scene '{}'", path.display()))?;
        self.load(&mut src)
    }

    /// Parse scene text already in memory.
    pub fn load_str(&mut self, text: &str) -> anyhow::Result<()> {
        let mut src = SceneSource::from_str(text);
        self.load(&mut src)
    }

    fn load(&mut self, src: &mut SceneSource) -> anyhow::Result<()> {
        while let Some(line) = src.next_line() {
            let rest = line.rest.as_str();
            match line.keyword.as_str() {
                "camera" => {
                    let (tok, _) = next_token(rest);
                    let kind = tok.to_ascii_lowercase();
                    if kind != "pinhole" {
                        bail!("unrecognized camera type '{}'", tok);
                    }
                    let (camera, screen) = Camera::from_block(src);
                    self.camera = camera;
                    self.screen = screen;
                    self.has_camera = true;
                }
                "light" => {
                    let light = Light::from_block(src);
                    self.add_light(light);
                }
                "material" => {
                    let (tok, _) = next_token(rest);
                    self.load_material(&tok.to_ascii_lowercase(), src);
                }
                "object" => {
                    let (tok, _) = next_token(rest);
                    if let Some(id) = self.load_object(&tok.to_ascii_lowercase(), src) {
                        self.geometry.push(id);
                    }
                }
                "texture" => {
                    let tex = Texture::from_block(src);
                    self.add_texture(tex);
                }
                "shader" => {
                    let shader = Shader::from_block(src);
                    self.add_shader(shader);
                }
                "float" => {
                    let (name, rest) = next_token(rest);
                    if !name.is_empty() {
                        let (value, _) = next_token(rest);
                        self.variables.declare_float(name, parse_f32(value));
                    }
                }
                "int" => {
                    let (name, rest) = next_token(rest);
                    if !name.is_empty() {
                        let (value, _) = next_token(rest);
                        self.variables.declare_int(name, parse_i32(value));
                    }
                }
                "bool" => {
                    let (name, rest) = next_token(rest);
                    if !name.is_empty() {
                        let (value, _) = next_token(rest);
                        self.variables.declare_bool(name, parse_bool(value));
                    }
                }
                "texturepath" => {
                    let (dir, _) = next_token(rest);
                    self.paths.add_texture_path(dir);
                }
                "modelpath" => {
                    let (dir, _) = next_token(rest);
                    self.paths.add_model_path(dir);
                }
                "shaderpath" => {
                    let (dir, _) = next_token(rest);
                    self.paths.add_shader_path(dir);
                }
                other => src.skip_unknown("scene", other),
            }
        }

        if !self.has_camera {
            bail!("scene file declares no camera");
        }
        Ok(())
    }

    /// Construct a material block of the given type and store it. Unknown
    /// types log a warning and skip the whole block.
    pub fn load_material(&mut self, type_name: &str, src: &mut SceneSource) -> Option<MaterialId> {
        let Some(factory) = self.material_registry.get(type_name) else {
            log::warn!("unknown material type '{}'; skipping its block", type_name);
            src.skip_block();
            return None;
        };
        let material = factory(src, self);
        let id = MaterialId(self.materials.len());
        if let Some(name) = material.name.clone() {
            self.material_names.insert(name, id);
        }
        self.materials.push(material);
        Some(id)
    }

    /// Construct an object block of the given type and store it. Unknown
    /// types log a warning and skip the whole block. Top-level callers add
    /// the result to the geometry list; groups keep the id themselves.
    pub fn load_object(&mut self, type_name: &str, src: &mut SceneSource) -> Option<ObjectId> {
        let Some(factory) = self.object_registry.get(type_name) else {
            log::warn!("unknown object type '{}'; skipping its block", type_name);
            src.skip_block();
            return None;
        };
        let object = factory(src, self);
        let id = ObjectId(self.objects.len());
        if let Some(name) = object.name.clone() {
            self.object_names.insert(name, id);
        }
        self.objects.push(object);
        Some(id)
    }

    /// Resolve a `material <token>` line inside an object block. The token
    /// is either a material type name (inline block follows) or a reference
    /// to a named material declared earlier; a dangling reference falls back
    /// to the default material.
    pub(crate) fn material_for_reference(
        &mut self,
        token: &str,
        src: &mut SceneSource,
    ) -> Option<MaterialId> {
        if token.is_empty() {
            log::warn!("material line without a type or name");
            return None;
        }
        let type_name = token.to_ascii_lowercase();
        if self.material_registry.contains(&type_name) {
            return self.load_material(&type_name, src);
        }
        match self.find_material(token) {
            Some(id) => Some(id),
            None => {
                log::warn!("unknown material '{}'; using the default material", token);
                Some(self.default_material())
            }
        }
    }

    /// Store a texture block, deduplicating by source file: a file already
    /// seen reuses its entity and only gains the new name.
    pub fn add_texture(&mut self, tex: Texture) -> TextureId {
        if let Some(file) = &tex.file {
            if let Some(&existing) = self.texture_files.get(file) {
                if let Some(name) = tex.name {
                    self.texture_names.insert(name, existing);
                }
                return existing;
            }
        }
        let id = TextureId(self.textures.len());
        if let Some(name) = tex.name.clone() {
            self.texture_names.insert(name, id);
        }
        if let Some(file) = tex.file.clone() {
            self.texture_files.insert(file, id);
        }
        self.textures.push(tex);
        id
    }

    /// Texture handle for a file referenced directly from a material,
    /// reusing the entity if the file was seen before.
    pub fn texture_for_file(&mut self, file: &str) -> TextureId {
        let path = PathBuf::from(file);
        if let Some(&id) = self.texture_files.get(&path) {
            return id;
        }
        self.add_texture(Texture::from_file(path))
    }

    pub fn add_shader(&mut self, shader: Shader) -> ShaderId {
        let id = ShaderId(self.shaders.len());
        if let Some(name) = shader.name.clone() {
            self.shader_names.insert(name, id);
        }
        self.shaders.push(shader);
        id
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    // Name lookups. Names are case-sensitive as declared; a re-declared
    // name resolves to its newest entity.

    pub fn find_material(&self, name: &str) -> Option<MaterialId> {
        self.material_names.get(name).copied()
    }

    pub fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.object_names.get(name).copied()
    }

    pub fn find_texture(&self, name: &str) -> Option<TextureId> {
        self.texture_names.get(name).copied()
    }

    pub fn find_shader(&self, name: &str) -> Option<ShaderId> {
        self.shader_names.get(name).copied()
    }

    /// Handle of the gray fallback material installed at slot 0.
    pub fn default_material(&self) -> MaterialId {
        MaterialId(0)
    }

    // Arena accessors.

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }

    pub fn texture(&self, id: TextureId) -> &Texture {
        &self.textures[id.0]
    }

    pub fn shader(&self, id: ShaderId) -> &Shader {
        &self.shaders[id.0]
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn light(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn geometry(&self) -> &[ObjectId] {
        &self.geometry
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }

    pub fn paths(&self) -> &SearchPaths {
        &self.paths
    }

    pub fn material_registry_mut(&mut self) -> &mut MaterialRegistry {
        &mut self.material_registry
    }

    pub fn object_registry_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.object_registry
    }

    /// Post-parse resource pass: load the OBJ data for every mesh object
    /// that names a file. A missing or defective file leaves the object
    /// hollow with a warning instead of failing the load.
    pub fn preprocess(&mut self) {
        for index in 0..self.objects.len() {
            let file = match &self.objects[index].shape {
                Shape::Mesh { file, data: None } if !file.as_os_str().is_empty() => file.clone(),
                _ => continue,
            };
            let resolved = self.paths.resolve_model(&file.to_string_lossy());
            match MeshData::load(&resolved) {
                Ok(mesh) => {
                    if let Shape::Mesh { data, .. } = &mut self.objects[index].shape {
                        log::debug!(
                            "loaded mesh '{}' ({} triangles)",
                            resolved.display(),
                            mesh.triangle_count()
                        );
                        *data = Some(mesh);
                    }
                }
                Err(err) => {
                    log::warn!("cannot load mesh '{}': {:#}", resolved.display(), err);
                }
            }
        }
    }

    /// Serializable overview for the CLI.
    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            camera: self.camera.clone(),
            screen: self.screen,
            lights: self.lights.clone(),
            objects: self.objects.len(),
            top_level_objects: self.geometry.len(),
            materials: self.materials.len(),
            textures: self.textures.len(),
            shaders: self.shaders.len(),
            floats: self.variables.floats().map(|(n, v)| (n.to_owned(), v)).collect(),
            ints: self.variables.ints().map(|(n, v)| (n.to_owned(), v)).collect(),
            bools: self.variables.bools().map(|(n, v)| (n.to_owned(), v)).collect(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// What `inspect` reports about a loaded scene.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub camera: Camera,
    pub screen: ScreenSize,
    pub lights: Vec<Light>,
    pub objects: usize,
    pub top_level_objects: usize,
    pub materials: usize,
    pub textures: usize,
    pub shaders: usize,
    pub floats: Vec<(String, f32)>,
    pub ints: Vec<(String, i32)>,
    pub bools: Vec<(String, bool)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const BASIC_SCENE: &str = "\
# a minimal but complete scene
camera pinhole
    eye 0 0 5
    fovy 60
end

light
    pos 4 4 4
    rgb 1 1 1
end

material lambertian
    name Red
    dif 1 0 0
end

object sphere
    material Red
    center 0 0 0
    radius 1
end
";

    #[test]
    fn test_load_basic_scene() {
        let mut scene = Scene::new();
        scene.load_str(BASIC_SCENE).unwrap();

        assert_eq!(scene.camera().eye, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(scene.camera().fovy, 60.0);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.geometry().len(), 1);

        let sphere = scene.object(scene.geometry()[0]);
        let red = scene.find_material("Red").unwrap();
        assert_eq!(sphere.material, Some(red));
    }

    #[test]
    fn test_scene_without_camera_fails() {
        let mut scene = Scene::new();
        let err = scene.load_str("light\nend\n").unwrap_err();
        assert!(err.to_string().contains("no camera"));
    }

    #[test]
    fn test_unrecognized_camera_type_fails() {
        let mut scene = Scene::new();
        let err = scene.load_str("camera fisheye\nend\n").unwrap_err();
        assert!(err.to_string().contains("fisheye"));
    }

    #[test]
    fn test_unknown_top_level_block_is_skipped() {
        let text = "\
fogvolume
    density 0.4
    inner
        radius 2
    end
end
camera pinhole
end
";
        let mut scene = Scene::new();
        scene.load_str(text).unwrap();
        assert_eq!(scene.camera().fovy, 90.0);
    }

    #[test]
    fn test_redeclared_name_keeps_old_entity_alive() {
        let mut scene = Scene::new();
        let mut src = SceneSource::from_str("name M\ncolor 1 0 0\nend\n");
        let first = scene.load_material("constant", &mut src).unwrap();

        let mut src = SceneSource::from_str("name M\ncolor 0 1 0\nend\n");
        let second = scene.load_material("constant", &mut src).unwrap();

        assert_ne!(first, second);
        assert_eq!(scene.find_material("M"), Some(second));
        // The first entity is still addressable through its handle.
        assert_eq!(scene.material(first).name.as_deref(), Some("M"));
    }

    #[test]
    fn test_variable_declarations() {
        let text = "\
camera pinhole
end
float fovScale 1.3
int bounces 4
bool shadows on
";
        let mut scene = Scene::new();
        scene.load_str(text).unwrap();

        let vars = scene.variables();
        assert_eq!(vars.float(vars.lookup_float("fovScale").unwrap()), 1.3);
        assert_eq!(vars.int(vars.lookup_int("bounces").unwrap()), 4);
        assert!(vars.bool(vars.lookup_bool("shadows").unwrap()));
    }

    #[test]
    fn test_texture_dedup_across_declarations() {
        let text = "\
camera pinhole
end
texture
    name Bricks
    file bricks.ppm
end
material lambertian
    tex bricks.ppm
end
";
        let mut scene = Scene::new();
        scene.load_str(text).unwrap();

        let by_name = scene.find_texture("Bricks").unwrap();
        assert_eq!(scene.summary().textures, 1);
        assert_eq!(scene.texture(by_name).file, Some(PathBuf::from("bricks.ppm")));
    }

    #[test]
    fn test_group_collects_children() {
        let text = "\
camera pinhole
end
object group
    name Pair
    object sphere
        radius 1
    end
    object sphere
        radius 2
    end
end
";
        let mut scene = Scene::new();
        scene.load_str(text).unwrap();

        let group = scene.object(scene.find_object("Pair").unwrap());
        match &group.shape {
            Shape::Group { children } => assert_eq!(children.len(), 2),
            _ => panic!("expected group"),
        }
        // Children live in the arena but not in the top-level list.
        assert_eq!(scene.geometry().len(), 1);
    }

    #[test]
    fn test_group_child_type_matched_case_insensitively() {
        // Type-name tokens case-fold inside groups just like at top level.
        let text = "\
camera pinhole
end
object group
    name Pair
    object Sphere
        radius 1
    end
    object TRIANGLE
        v0 0 0 0
        v1 1 0 0
        v2 0 1 0
    end
end
";
        let mut scene = Scene::new();
        scene.load_str(text).unwrap();

        let group = scene.object(scene.find_object("Pair").unwrap());
        match &group.shape {
            Shape::Group { children } => assert_eq!(children.len(), 2),
            _ => panic!("expected group"),
        }
    }

    #[test]
    fn test_instance_resolves_named_object() {
        let text = "\
camera pinhole
end
object sphere
    name Ball
    radius 1
end
object instance
    of Ball
end
";
        let mut scene = Scene::new();
        scene.load_str(text).unwrap();

        let instance = scene.object(scene.geometry()[1]);
        match instance.shape {
            Shape::Instance { source } => {
                assert_eq!(source, scene.find_object("Ball"));
            }
            _ => panic!("expected instance"),
        }
    }

    #[test]
    fn test_preprocess_tolerates_missing_mesh_file() {
        let text = "\
camera pinhole
end
object mesh
    file not_there.obj
end
";
        let mut scene = Scene::new();
        scene.load_str(text).unwrap();
        scene.preprocess();

        match &scene.object(scene.geometry()[0]).shape {
            Shape::Mesh { data, .. } => assert!(data.is_none()),
            _ => panic!("expected mesh"),
        }
    }
}
