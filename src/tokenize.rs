//! Low-level text parsing for scene files.
//!
//! Scene files are line-oriented: each line is a whitespace-delimited
//! keyword followed by its arguments. Keywords are matched case-insensitively
//! (callers lower-case them before dispatch); values and declared names keep
//! whatever case the file used.
//!
//! Numeric parsing is deliberately forgiving. Scene files in the wild carry
//! trailing punctuation and half-numeric tokens, so value parsers take the
//! longest valid leading prefix and read total garbage as zero rather than
//! failing the load.

use glam::Vec3;

/// Split the next whitespace-delimited token off the front of `input`.
///
/// Returns the token and the remainder of the line. An exhausted input
/// yields an empty token; callers detect end-of-line themselves.
pub fn next_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], &input[end..]),
        None => (input, ""),
    }
}

/// Lower-case a token for keyword dispatch.
pub fn keyword(token: &str) -> String {
    token.to_ascii_lowercase()
}

/// Best-effort float parse: longest valid leading prefix, 0.0 on garbage.
pub fn parse_f32(token: &str) -> f32 {
    if let Ok(v) = token.parse::<f32>() {
        return v;
    }
    // Walk back from the end until a valid prefix parses.
    for end in (1..token.len()).rev() {
        if !token.is_char_boundary(end) {
            continue;
        }
        if let Ok(v) = token[..end].parse::<f32>() {
            return v;
        }
    }
    0.0
}

/// Best-effort integer parse, mirroring [`parse_f32`].
pub fn parse_i32(token: &str) -> i32 {
    if let Ok(v) = token.parse::<i32>() {
        return v;
    }
    // Fall back through the float path so "3.7" reads as 3.
    parse_f32(token) as i32
}

/// Parse a boolean value token. Accepts true/false, t/f, on/off, 1/0.
///
/// Anything unrecognized reads as false, in keeping with the
/// default-toward-zero policy for malformed values.
pub fn parse_bool(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "true" | "t" | "on" | "yes" | "1"
    )
}

/// Consume one float from the front of `input`.
pub fn next_f32(input: &str) -> (f32, &str) {
    let (tok, rest) = next_token(input);
    (parse_f32(tok), rest)
}

/// Consume one integer from the front of `input`.
pub fn next_i32(input: &str) -> (i32, &str) {
    let (tok, rest) = next_token(input);
    (parse_i32(tok), rest)
}

/// Consume three floats from the front of `input` as a vector.
pub fn next_vec3(input: &str) -> (Vec3, &str) {
    let (x, rest) = next_f32(input);
    let (y, rest) = next_f32(rest);
    let (z, rest) = next_f32(rest);
    (Vec3::new(x, y, z), rest)
}
