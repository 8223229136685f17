//! OBJ mesh geometry.
//!
//! Backs the `mesh` object variant. Geometry is loaded from Wavefront OBJ
//! files during scene preprocessing; this module only holds the data and a
//! bounding box — uploading it anywhere is the renderer's business.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Axis-aligned bounding box for a mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    /// Compute bounding box from a set of points.
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in points {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Self { min, max }
    }

    /// Get the center of the bounding box.
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// Get the dimensions of the bounding box.
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Triangle geometry loaded from an OBJ file.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    /// Empty when the OBJ carried no normals; consumers generate their own.
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub bounds: BoundingBox,
}

impl MeshData {
    /// Parse mesh data from OBJ format content.
    ///
    /// All models in the file are combined into one mesh. Positions and
    /// faces are required; normals are kept only if every model has them.
    pub fn from_obj(obj_content: &str) -> Result<Self> {
        let mut cursor = std::io::Cursor::new(obj_content.as_bytes());

        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };

        let (models, _materials) =
            tobj::load_obj_buf(&mut cursor, &load_options, |_| Ok((vec![], HashMap::new())))
                .context("failed to parse OBJ")?;

        if models.is_empty() {
            bail!("OBJ file contains no models");
        }

        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut vertex_offset = 0u32;
        let mut has_normals = true;

        for model in &models {
            let mesh = &model.mesh;
            if mesh.positions.is_empty() {
                continue;
            }

            let vertex_count = mesh.positions.len() / 3;
            let model_has_normals = mesh.normals.len() == mesh.positions.len();
            if !model_has_normals {
                has_normals = false;
            }

            for i in 0..vertex_count {
                positions.push([
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ]);
                if model_has_normals {
                    normals.push([
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    ]);
                }
            }

            for idx in &mesh.indices {
                indices.push(vertex_offset + idx);
            }
            vertex_offset += vertex_count as u32;
        }

        if positions.is_empty() {
            bail!("OBJ file contains no vertices");
        }
        if !has_normals || normals.len() != positions.len() {
            normals.clear();
        }

        let bounds = BoundingBox::from_points(&positions);
        Ok(Self {
            positions,
            normals,
            indices,
            bounds,
        })
    }

    /// Load mesh data from an OBJ file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot open mesh file {}", path.display()))?;
        Self::from_obj(&content)
            .with_context(|| format!("while loading mesh {}", path.display()))
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
