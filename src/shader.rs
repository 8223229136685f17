//! Shader program resources.
//!
//! A shader entity records the vertex/fragment source files a shader-backed
//! material wants. Compilation and reloading are the renderer's job; the
//! scene keeps every shader in one list precisely so a reload command can
//! walk them all.

use std::path::PathBuf;

use crate::parse::SceneSource;
use crate::tokenize::next_token;

/// Stable handle into the scene's shader arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderId(pub(crate) usize);

#[derive(Debug, Clone, Default)]
pub struct Shader {
    pub name: Option<String>,
    pub vertex: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
}

impl Shader {
    /// Parse a `shader ... end` block.
    pub fn from_block(src: &mut SceneSource) -> Shader {
        let mut shader = Shader::default();

        while let Some(line) = src.next_line() {
            if line.is_end() {
                break;
            }
            let rest = line.rest.as_str();
            match line.keyword.as_str() {
                "name" => {
                    let (tok, _) = next_token(rest);
                    if !tok.is_empty() {
                        shader.name = Some(tok.to_owned());
                    }
                }
                "vert" | "vertex" => {
                    let (tok, _) = next_token(rest);
                    if !tok.is_empty() {
                        shader.vertex = Some(PathBuf::from(tok));
                    }
                }
                "frag" | "fragment" => {
                    let (tok, _) = next_token(rest);
                    if !tok.is_empty() {
                        shader.fragment = Some(PathBuf::from(tok));
                    }
                }
                other => src.skip_unknown("shader", other),
            }
        }

        shader
    }
}
