//! Texture resources.
//!
//! Textures are named entities owned by the scene. The scene dedups them two
//! ways: by declared name (for `name`-carrying blocks) and by source file,
//! so a texture file referenced from several materials is recorded once.
//! Pixel upload belongs to the rendering collaborator; here a texture is its
//! identity plus where its data comes from.

use std::path::PathBuf;

use crate::parse::SceneSource;
use crate::tokenize::next_token;

/// Stable handle into the scene's texture arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureId(pub(crate) usize);

#[derive(Debug, Clone)]
pub struct Texture {
    pub name: Option<String>,
    pub file: Option<PathBuf>,
}

impl Texture {
    /// A texture backed directly by an image file, with no declared name.
    pub fn from_file(file: PathBuf) -> Self {
        Self { name: None, file: Some(file) }
    }

    /// Parse a `texture ... end` block.
    pub fn from_block(src: &mut SceneSource) -> Texture {
        let mut tex = Texture { name: None, file: None };

        while let Some(line) = src.next_line() {
            if line.is_end() {
                break;
            }
            let rest = line.rest.as_str();
            match line.keyword.as_str() {
                "name" => {
                    let (tok, _) = next_token(rest);
                    if !tok.is_empty() {
                        tex.name = Some(tok.to_owned());
                    }
                }
                "file" => {
                    let (tok, _) = next_token(rest);
                    if !tok.is_empty() {
                        tex.file = Some(PathBuf::from(tok));
                    }
                }
                other => src.skip_unknown("texture", other),
            }
        }

        tex
    }
}
