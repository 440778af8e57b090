//! Byte classification used by the readers.
//!
//! C locale only. The tokenizer and the line reader deliberately use
//! narrower classes than [`is_space`]: tokens split on space/CR/LF only,
//! so a tab stays inside a token.

/// Returns `true` if `c` is a whitespace character.
///
/// Whitespace: space, tab, newline, vertical tab, form feed, carriage return.
#[inline]
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Returns `true` if `c` is a decimal digit (`[0-9]`).
#[inline]
pub fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// Returns `true` if `c` ends a line (`\n` or `\r`).
#[inline]
pub fn is_line_terminator(c: u8) -> bool {
    matches!(c, b'\n' | b'\r')
}

/// Returns `true` if `c` separates tokens (space, `\r`, `\n`).
#[inline]
pub fn is_token_separator(c: u8) -> bool {
    matches!(c, b' ' | b'\n' | b'\r')
}

/// Returns `true` if `c` would switch a float literal out of plain decimal
/// notation (hex prefix, exponent, binary exponent).
#[inline]
pub fn is_float_marker(c: u8) -> bool {
    matches!(c, b'x' | b'X' | b'e' | b'E' | b'p' | b'P')
}
