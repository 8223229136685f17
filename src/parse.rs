//! Scene file cursor and block parsing.
//!
//! A scene file is a sequence of keyword lines grouped into blocks that run
//! from an opening keyword (`camera`, `light`, `material ...`) to a matching
//! `end` sentinel. Entity constructors drive the cursor line by line; when a
//! constructor meets a keyword it does not understand, the recovery path here
//! discards it safely — including whole nested blocks — so the parent parser
//! resumes at the right line instead of being confused by an inner `end`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::tokenize::{keyword, next_token};

/// One meaningful line of a scene file: the lower-cased first token plus the
/// untouched remainder of the line.
#[derive(Debug, Clone)]
pub struct Line {
    pub keyword: String,
    pub rest: String,
    pub number: usize,
}

impl Line {
    /// True if this line is a block's `end` sentinel.
    pub fn is_end(&self) -> bool {
        self.keyword == "end"
    }
}

/// Keywords that open a `... end` block.
///
/// Needed by unknown-keyword recovery: an unrecognized keyword that opens a
/// block (say a material defined inside an unhandled object type) must be
/// skipped through its own `end`, not just one line.
pub fn is_block_keyword(word: &str) -> bool {
    matches!(
        word,
        "camera" | "light" | "material" | "object" | "texture" | "shader" | "group" | "instance"
    )
}

/// Cursor over the lines of a scene file.
///
/// The whole file is read up front; parsing is a single synchronous pass and
/// scene files are small. Comment lines (first non-blank character `#`) and
/// blank lines never reach callers.
pub struct SceneSource {
    lines: Vec<String>,
    pos: usize,
}

impl SceneSource {
    /// Build a source from in-memory text. Used heavily by tests.
    pub fn from_str(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_owned).collect(),
            pos: 0,
        }
    }

    /// Open a scene file. An unopenable file is the one truly fatal
    /// condition of the load path.
    pub fn open(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot open scene file {}", path.display()))?;
        Ok(Self::from_str(&text))
    }

    /// Advance to the next non-comment, non-blank line.
    ///
    /// Returns `None` at end of file. A block left unterminated at EOF is a
    /// tolerated malformed-input path: the caller's loop simply ends.
    pub fn next_line(&mut self) -> Option<Line> {
        while self.pos < self.lines.len() {
            let number = self.pos + 1;
            let raw = &self.lines[self.pos];
            self.pos += 1;

            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (tok, rest) = next_token(trimmed);
            return Some(Line {
                keyword: keyword(tok),
                rest: rest.to_owned(),
                number,
            });
        }
        None
    }

    /// Unknown-keyword recovery.
    ///
    /// Emits a diagnostic and discards the unrecognized content. If the
    /// keyword opens a block, lines are consumed until its `end` — tracking
    /// nested block keywords with an explicit depth counter so exactly one
    /// `end` is balanced per entered block. A block that never sees its
    /// `end` is closed by EOF without further complaint.
    pub fn skip_unknown(&mut self, context: &str, word: &str) {
        if !is_block_keyword(word) {
            log::warn!("unknown keyword '{}' while reading {}; line ignored", word, context);
            return;
        }

        log::warn!(
            "unknown keyword '{}' while reading {}; skipping its block",
            word,
            context
        );
        self.skip_block();
    }

    /// Skip a block whose opening line has already been consumed, balancing
    /// nested blocks. Also used when a factory recognizes the entity kind
    /// but not the concrete type name.
    pub fn skip_block(&mut self) {
        let mut depth = 1usize;
        while let Some(line) = self.next_line() {
            if line.is_end() {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            } else if is_block_keyword(&line.keyword) {
                depth += 1;
            }
        }
    }
}
