//! Escape-sequence-aware scanning and width-bounded cutting.
//!
//! The scanner has two modes: inside an escape sequence (`ESC [ ... m`) it
//! copies bytes through untouched and reports a single zero-width token;
//! outside it yields one printable character at a time with its display
//! width. A truncated sequence (no final `m`) runs to the end of the input.

use unicode_width::UnicodeWidthChar;

pub const ESC: char = '\x1b';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Escape(&'a str),
    Glyph(&'a str, usize),
}

/// Yields `(byte_offset, token)` pairs covering the whole input.
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let rest = &self.src[start..];
        let c = rest.chars().next()?;

        let token = if c == ESC {
            let len = escape_len(rest);
            Token::Escape(&rest[..len])
        } else {
            Token::Glyph(&rest[..c.len_utf8()], char_width(c))
        };
        self.pos += match token {
            Token::Escape(s) | Token::Glyph(s, _) => s.len(),
        };
        Some((start, token))
    }
}

/// Byte length of the escape sequence at the start of `s` (which begins
/// with ESC). A lone ESC is one byte.
fn escape_len(s: &str) -> usize {
    if s.as_bytes().get(1) != Some(&b'[') {
        return ESC.len_utf8();
    }
    match s[2..].find('m') {
        Some(i) => 2 + i + 1,
        None => s.len(),
    }
}

pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Terminal columns occupied by `s`; escape sequences count as zero.
pub fn display_width(s: &str) -> usize {
    Scanner::new(s)
        .map(|(_, t)| match t {
            Token::Glyph(_, w) => w,
            Token::Escape(_) => 0,
        })
        .sum()
}

/// Splits `s` into a prefix of at most `width` columns and the remainder.
///
/// Escape sequences stay whole and ride along with the prefix. The cut lands
/// on the first glyph that would overflow, so `prefix + remainder == s`.
pub fn cut_to_width(s: &str, width: usize) -> (&str, &str) {
    if width == 0 {
        return ("", s);
    }
    let mut used = 0;
    for (at, token) in Scanner::new(s) {
        if let Token::Glyph(_, w) = token {
            if used + w > width {
                return s.split_at(at);
            }
            used += w;
        }
    }
    (s, "")
}
