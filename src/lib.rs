//! Loader for line-oriented scene description files.
//!
//! A scene file declares a camera, lights, materials, textures, shaders,
//! geometry, and runtime-tweakable variables as keyword blocks terminated by
//! `end`. This crate parses those files into a [`scene::Scene`], resolves
//! referenced OBJ meshes, and lets applications bind keystrokes to the
//! declared variables. Rendering itself is out of scope; the scene exposes
//! read accessors (camera matrices, light lists, geometry) for whatever
//! consumes it.

pub mod camera;
pub mod cli;
pub mod keybind;
pub mod light;
pub mod material;
pub mod mesh;
pub mod object;
pub mod parse;
pub mod paths;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod tokenize;
pub mod variables;
