use super::ansi::{Scanner, Token, cut_to_width, display_width};

/// Paints `overlay` onto `base` with its top-left corner at column `x`,
/// row `y`. Each covered base row becomes `left + overlay_line + right`;
/// overlay rows past the end of `base` are dropped.
///
/// Escape sequences inside the covered span are replayed in front of
/// `right`, so the uncovered tail keeps the styling it had in `base`.
pub fn place_overlay(x: usize, y: usize, overlay: &str, base: &str) -> String {
    let mut lines: Vec<String> = base.split('\n').map(str::to_string).collect();

    for (i, o_line) in overlay.split('\n').enumerate() {
        let Some(line) = lines.get_mut(y + i) else {
            break;
        };
        let composed = {
            let (left, rest) = cut_to_width(line, x);
            let (covered, right) = cut_to_width(rest, display_width(o_line));
            // styles switched under the overlay still apply to `right`
            format!("{left}{o_line}{}{right}", escapes(covered))
        };
        *line = composed;
    }

    lines.join("\n")
}

fn escapes(s: &str) -> String {
    Scanner::new(s)
        .filter_map(|(_, t)| match t {
            Token::Escape(e) => Some(e),
            Token::Glyph(..) => None,
        })
        .collect()
}
