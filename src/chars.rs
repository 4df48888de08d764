/// Named character constants.
pub const CHAR_NUL: char = '\u{0}';
pub const CHAR_BEL: char = '\u{7}';
pub const CHAR_TAB: char = '\t';
pub const CHAR_SPACE: char = ' ';

/// Character literal table: maps the text after a `\` to a character.
pub struct CharTable;

impl CharTable {
    /// Get the named character for a name like "bel", "space", "tab".
    pub fn named_char(name: &str) -> Option<char> {
        match name {
            "bel" => Some(CHAR_BEL),
            "space" => Some(CHAR_SPACE),
            "tab" => Some(CHAR_TAB),
            _ => None,
        }
    }

    /// Decode the body of a character token (everything after the `\`).
    ///
    /// A single character stands for itself. Unknown names decode to NUL
    /// rather than failing.
    pub fn decode(body: &str) -> char {
        let mut chars = body.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => Self::named_char(body).unwrap_or(CHAR_NUL),
        }
    }
}
