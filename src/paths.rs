//! Search paths for files referenced by scene files.
//!
//! Scene files name textures, models, and shader sources by bare filename;
//! the file declares where to look with `texturepath`, `modelpath`, and
//! `shaderpath` lines. Resolution tries the name as given first, then each
//! registered directory in order.

use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct SearchPaths {
    textures: Vec<PathBuf>,
    models: Vec<PathBuf>,
    shaders: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture_path(&mut self, dir: impl Into<PathBuf>) {
        self.textures.push(dir.into());
    }

    pub fn add_model_path(&mut self, dir: impl Into<PathBuf>) {
        self.models.push(dir.into());
    }

    pub fn add_shader_path(&mut self, dir: impl Into<PathBuf>) {
        self.shaders.push(dir.into());
    }

    /// Resolve a texture filename. Texture pixels are read by the rendering
    /// collaborator, which calls this with the file recorded on the entity.
    pub fn resolve_texture(&self, name: &str) -> PathBuf {
        resolve(&self.textures, name)
    }

    pub fn resolve_model(&self, name: &str) -> PathBuf {
        resolve(&self.models, name)
    }

    /// Resolve a shader source filename for the shader-compiling
    /// collaborator, same contract as [`SearchPaths::resolve_texture`].
    pub fn resolve_shader(&self, name: &str) -> PathBuf {
        resolve(&self.shaders, name)
    }
}

/// Try the name directly, then each directory. If nothing exists yet the
/// bare name is returned unchanged — callers report the miss when they
/// actually open the file.
fn resolve(dirs: &[PathBuf], name: &str) -> PathBuf {
    let direct = PathBuf::from(name);
    if direct.exists() {
        return direct;
    }
    for dir in dirs {
        let candidate: PathBuf = dir.join(Path::new(name));
        if candidate.exists() {
            return candidate;
        }
    }
    direct
}
