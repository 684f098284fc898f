//! Unicode escape expansion, applied before lexing.
//!
//! Java processes `\uXXXX` escapes ahead of tokenization (JLS 3.3), so an
//! escape can spell out any part of the program, including keywords and
//! string delimiters. An escape is only recognized when the backslash is
//! preceded by an even number of backslashes, and the `u` may be repeated.

use std::borrow::Cow;

use crate::parser::error::{ParseError, ParseErrorKind, ParseResult};
use crate::source::SourceFile;

/// The expanded text plus a map from expanded byte offsets back to original
/// byte offsets. The map is only materialized when the source actually
/// contains escapes.
pub struct Expanded<'a> {
    pub text: Cow<'a, str>,
    map: Option<Vec<usize>>,
}

impl Expanded<'_> {
    /// Translate an offset into the expanded text back to an offset into the
    /// original source.
    pub fn original_offset(&self, expanded: usize) -> usize {
        match &self.map {
            None => expanded,
            Some(map) => map.get(expanded).copied().unwrap_or_else(|| {
                map.last().map(|&last| last + 1).unwrap_or(0)
            }),
        }
    }
}

/// Expand all unicode escapes in `source`, keeping byte positions traceable.
pub fn expand(source: &SourceFile) -> ParseResult<Expanded<'_>> {
    let text = source.text();
    if !has_escape_candidate(text) {
        return Ok(Expanded { text: Cow::Borrowed(text), map: None });
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut map = Vec::with_capacity(text.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            match bytes[i + 1] {
                // An escaped backslash keeps the following char literal.
                b'\\' => {
                    push_char(&mut out, &mut map, '\\', i);
                    push_char(&mut out, &mut map, '\\', i + 1);
                    i += 2;
                    continue;
                }
                b'u' => {
                    let start = i;
                    let value = read_escape(source, bytes, &mut i)?;
                    let ch = match char::from_u32(value) {
                        Some(ch) => ch,
                        None => {
                            // A high surrogate must pair with a following
                            // low-surrogate escape.
                            let low = peek_low_surrogate(source, bytes, &mut i, value)?;
                            let combined =
                                0x10000 + ((value - 0xD800) << 10) + (low - 0xDC00);
                            char::from_u32(combined).ok_or_else(|| {
                                escape_error(source, start)
                            })?
                        }
                    };
                    push_char(&mut out, &mut map, ch, start);
                    continue;
                }
                _ => {}
            }
        }
        let ch = text[i..].chars().next().expect("offset is on a char boundary");
        push_char(&mut out, &mut map, ch, i);
        i += ch.len_utf8();
    }
    Ok(Expanded { text: Cow::Owned(out), map: Some(map) })
}

fn has_escape_candidate(text: &str) -> bool {
    text.as_bytes().windows(2).any(|pair| pair == b"\\u")
}

fn push_char(out: &mut String, map: &mut Vec<usize>, ch: char, original: usize) {
    out.push(ch);
    for _ in 0..ch.len_utf8() {
        map.push(original);
    }
}

/// Read `\u+XXXX` starting at `*i` (positioned on the backslash); advances
/// past the escape and returns the code unit.
fn read_escape(source: &SourceFile, bytes: &[u8], i: &mut usize) -> ParseResult<u32> {
    let start = *i;
    *i += 1;
    while *i < bytes.len() && bytes[*i] == b'u' {
        *i += 1;
    }
    if *i + 4 > bytes.len() {
        return Err(escape_error(source, start));
    }
    let digits = &bytes[*i..*i + 4];
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(escape_error(source, start));
    }
    let hex = std::str::from_utf8(digits)
        .ok()
        .and_then(|digits| u32::from_str_radix(digits, 16).ok())
        .ok_or_else(|| escape_error(source, start))?;
    *i += 4;
    Ok(hex)
}

fn peek_low_surrogate(
    source: &SourceFile,
    bytes: &[u8],
    i: &mut usize,
    high: u32,
) -> ParseResult<u32> {
    if !(0xD800..0xDC00).contains(&high) {
        return Err(escape_error(source, *i));
    }
    if *i + 1 >= bytes.len() || bytes[*i] != b'\\' || bytes[*i + 1] != b'u' {
        return Err(escape_error(source, *i));
    }
    let low = read_escape(source, bytes, i)?;
    if !(0xDC00..0xE000).contains(&low) {
        return Err(escape_error(source, *i));
    }
    Ok(low)
}

fn escape_error(source: &SourceFile, offset: usize) -> ParseError {
    ParseError::new(
        source.clone(),
        source.location(offset),
        ParseErrorKind::InvalidUnicodeEscape,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_text(text: &str) -> (String, Vec<usize>) {
        let source = SourceFile::anonymous(text);
        let expanded = expand(&source).expect("expansion failed");
        let offsets = (0..expanded.text.len()).map(|i| expanded.original_offset(i)).collect();
        (expanded.text.into_owned(), offsets)
    }

    #[test]
    fn plain_text_is_borrowed() {
        let source = SourceFile::anonymous("class C {}");
        let expanded = expand(&source).expect("expansion failed");
        assert!(matches!(expanded.text, Cow::Borrowed(_)));
        assert_eq!(expanded.original_offset(7), 7);
    }

    #[test]
    fn expands_simple_escape() {
        let (text, offsets) = expand_text("\\u0041B");
        assert_eq!(text, "AB");
        assert_eq!(offsets, vec![0, 6]);
    }

    #[test]
    fn repeated_u_is_one_escape() {
        let (text, _) = expand_text(r"\uuu0041");
        assert_eq!(text, "A");
    }

    #[test]
    fn escaped_backslash_is_not_an_escape() {
        let (text, _) = expand_text(r"\\u0041");
        assert_eq!(text, r"\\u0041");
    }

    #[test]
    fn odd_backslash_run_expands() {
        let (text, _) = expand_text("\\\\\\u0041");
        assert_eq!(text, "\\\\A");
    }

    #[test]
    fn surrogate_pair_combines() {
        let (text, _) = expand_text("\\uD83D\\uDE00");
        assert_eq!(text, "\u{1F600}");
    }

    #[test]
    fn bad_hex_is_an_error() {
        let source = SourceFile::anonymous(r"\u00ZZ");
        assert!(expand(&source).is_err());
    }

    #[test]
    fn unpaired_surrogate_is_an_error() {
        let source = SourceFile::anonymous(r"\uD83D x");
        assert!(expand(&source).is_err());
    }

    #[test]
    fn keyword_spelled_by_escapes() {
        let (text, _) = expand_text("\\u0063lass");
        assert_eq!(text, "class");
    }
}
