//! Movetext parsing utilities — lightweight regex-based parser.
//!
//! Accepts bare movetext or a full PGN; headers, comments and
//! variations are stripped before move extraction.

use regex::Regex;

use crate::error::ParseError;

/// Extract SAN moves from movetext or PGN.
/// Fails with [`ParseError::NoMoves`] when nothing move-like is found.
pub fn parse_moves(movetext: &str) -> Result<Vec<String>, ParseError> {
    let moves = extract_moves(movetext);
    if moves.is_empty() {
        return Err(ParseError::NoMoves);
    }
    Ok(moves)
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Vec<String> {
    // Remove headers
    let header_re = Regex::new(r"\[[^\]]*\]").unwrap();
    let no_headers = header_re.replace_all(pgn, "");

    // Remove comments
    let comment_re = Regex::new(r"\{[^}]*\}").unwrap();
    let no_comments = comment_re.replace_all(&no_headers, "");

    // Remove variations
    let variation_re = Regex::new(r"\([^)]*\)").unwrap();
    let no_variations = variation_re.replace_all(&no_comments, "");

    // Extract moves
    let move_re =
        Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O").unwrap();

    move_re
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract a string value from a PGN header (e.g. White, Result).
pub fn extract_header(pgn: &str, header_name: &str) -> Option<String> {
    let pattern = format!(r#"\[{}\s+"([^"]*)"\]"#, regex::escape(header_name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(pgn)?.get(1)?.as_str().to_string();
    if value.is_empty() { None } else { Some(value) }
}
