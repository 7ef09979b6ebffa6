//! Word wrapping for styled text.
//!
//! Rows are built greedily: words separated by single spaces move to the
//! next row as a whole when they do not fit, and a word wider than the row
//! is cut by columns. A space that lands on a row boundary is dropped.
//! Escape sequences never count towards the width.

use super::ansi::{cut_to_width, display_width};

/// Wraps every line of `text` to at most `width` columns. Empty lines keep
/// their row, so the result is never shorter than the number of lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.split('\n') {
        wrap_line(line, width, &mut rows);
    }
    rows
}

fn wrap_line(line: &str, width: usize, rows: &mut Vec<String>) {
    let mut row = String::new();
    let mut used = 0;
    // true right after a row break, where a separating space is dropped
    let mut at_break = false;

    for (i, word) in line.split(' ').enumerate() {
        let word_width = display_width(word);
        if i > 0 && !at_break {
            if used > 0 && used + 1 + word_width > width {
                rows.push(std::mem::take(&mut row));
                used = 0;
                at_break = true;
            } else {
                row.push(' ');
                used += 1;
            }
        }

        let mut rest = word;
        while used + display_width(rest) > width {
            let (head, tail) = cut_to_width(rest, width - used);
            if display_width(head) == 0 {
                if used > 0 {
                    rows.push(std::mem::take(&mut row));
                    used = 0;
                    continue;
                }
                // a glyph wider than the whole row gets one to itself
                let (glyph, tail) = cut_to_width(rest, 2);
                rows.push(glyph.to_string());
                rest = tail;
                at_break = true;
                continue;
            }
            row.push_str(head);
            rows.push(std::mem::take(&mut row));
            used = 0;
            rest = tail;
            at_break = true;
        }

        if !rest.is_empty() {
            row.push_str(rest);
            used += display_width(rest);
            at_break = false;
        }
    }
    if !row.is_empty() || !at_break {
        rows.push(row);
    }
}
