//! Bridge between ratatui cell buffers and ANSI text.
//!
//! The compositor works on escape-coded strings; ratatui works on cells.
//! `buffer_to_ansi` flattens a drawn frame into lines, `ansi_to_lines`
//! turns composited text back into styled `Line`s for a `Paragraph`.

use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::ansi::{Scanner, Token};

pub const RESET: &str = "\x1b[0m";

const MODIFIER_CODES: [(Modifier, u8); 9] = [
    (Modifier::BOLD, 1),
    (Modifier::DIM, 2),
    (Modifier::ITALIC, 3),
    (Modifier::UNDERLINED, 4),
    (Modifier::SLOW_BLINK, 5),
    (Modifier::RAPID_BLINK, 6),
    (Modifier::REVERSED, 7),
    (Modifier::HIDDEN, 8),
    (Modifier::CROSSED_OUT, 9),
];

const NAMED: [Color; 16] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Gray,
    Color::DarkGray,
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
    Color::White,
];

/// An absolute SGR sequence for `style`: it always starts from a reset, so
/// the result does not depend on what was emitted before it.
pub fn sgr(style: Style) -> String {
    let mut params = vec!["0".to_string()];
    for (m, code) in MODIFIER_CODES {
        if style.add_modifier.contains(m) {
            params.push(code.to_string());
        }
    }
    if let Some(fg) = style.fg {
        push_color(&mut params, fg, 30);
    }
    if let Some(bg) = style.bg {
        push_color(&mut params, bg, 40);
    }
    format!("\x1b[{}m", params.join(";"))
}

fn push_color(params: &mut Vec<String>, color: Color, base: u8) {
    match color {
        Color::Reset => {}
        Color::Rgb(r, g, b) => params.push(format!("{};2;{r};{g};{b}", base + 8)),
        Color::Indexed(n) => params.push(format!("{};5;{n}", base + 8)),
        named => {
            if let Some(i) = NAMED.iter().position(|c| *c == named) {
                let i = i as u8;
                let code = if i < 8 { base + i } else { base + 60 + i - 8 };
                params.push(code.to_string());
            }
        }
    }
}

fn cell_style(buf: &Buffer, x: u16, y: u16) -> Style {
    let cell = &buf[(x, y)];
    Style::new()
        .fg(cell.fg)
        .bg(cell.bg)
        .add_modifier(cell.modifier)
}

/// One line per buffer row. Every row opens with its first cell's style
/// and closes with a reset; the trailing cells of wide glyphs are skipped.
pub fn buffer_to_ansi(buf: &Buffer) -> String {
    let area = buf.area;
    let mut rows = Vec::with_capacity(area.height as usize);

    for y in area.top()..area.bottom() {
        let mut row = String::new();
        let mut current: Option<Style> = None;
        let mut skip = 0usize;
        for x in area.left()..area.right() {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let style = cell_style(buf, x, y);
            if current != Some(style) {
                row.push_str(&sgr(style));
                current = Some(style);
            }
            let symbol = buf[(x, y)].symbol();
            row.push_str(symbol);
            skip = symbol.width().saturating_sub(1);
        }
        row.push_str(RESET);
        rows.push(row);
    }

    rows.join("\n")
}

/// Parses escape-coded text into styled lines. Styles carry across line
/// breaks; sequences other than SGR are dropped.
pub fn ansi_to_lines(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut style = Style::default();

    for (_, token) in Scanner::new(text) {
        match token {
            Token::Escape(seq) => {
                let next = apply_sgr(style, seq);
                if next != style {
                    flush(&mut spans, &mut run, style);
                    style = next;
                }
            }
            Token::Glyph("\n", _) => {
                flush(&mut spans, &mut run, style);
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            Token::Glyph(g, _) => run.push_str(g),
        }
    }
    flush(&mut spans, &mut run, style);
    lines.push(Line::from(spans));
    lines
}

fn flush(spans: &mut Vec<Span<'static>>, run: &mut String, style: Style) {
    if !run.is_empty() {
        spans.push(Span::styled(std::mem::take(run), style));
    }
}

fn apply_sgr(mut style: Style, seq: &str) -> Style {
    let Some(body) = seq
        .strip_prefix("\x1b[")
        .and_then(|s| s.strip_suffix('m'))
    else {
        return style;
    };
    if body.is_empty() {
        return Style::default();
    }

    let params: Vec<u16> = body.split(';').map(|p| p.parse().unwrap_or(0)).collect();
    let mut i = 0;
    while i < params.len() {
        let p = params[i];
        match p {
            0 => style = Style::default(),
            1..=9 => {
                if let Some((m, _)) = MODIFIER_CODES.iter().find(|(_, c)| u16::from(*c) == p) {
                    style = style.add_modifier(*m);
                }
            }
            22 => style = style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style = style.remove_modifier(Modifier::ITALIC),
            24 => style = style.remove_modifier(Modifier::UNDERLINED),
            27 => style = style.remove_modifier(Modifier::REVERSED),
            29 => style = style.remove_modifier(Modifier::CROSSED_OUT),
            30..=37 => style.fg = Some(NAMED[(p - 30) as usize]),
            90..=97 => style.fg = Some(NAMED[(p - 90 + 8) as usize]),
            39 => style.fg = None,
            40..=47 => style.bg = Some(NAMED[(p - 40) as usize]),
            100..=107 => style.bg = Some(NAMED[(p - 100 + 8) as usize]),
            49 => style.bg = None,
            38 | 48 => {
                let (color, used) = extended_color(&params[i + 1..]);
                if let Some(color) = color {
                    if p == 38 {
                        style.fg = Some(color);
                    } else {
                        style.bg = Some(color);
                    }
                }
                i += used;
            }
            _ => {}
        }
        i += 1;
    }
    style
}

/// `5;n` or `2;r;g;b` after a 38/48; returns the colour and how many
/// parameters it consumed.
fn extended_color(rest: &[u16]) -> (Option<Color>, usize) {
    match rest {
        [5, n, ..] => (Some(Color::Indexed(*n as u8)), 2),
        [2, r, g, b, ..] => (Some(Color::Rgb(*r as u8, *g as u8, *b as u8)), 4),
        _ => (None, rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use ratatui::widgets::{Paragraph, Widget};

    #[test]
    fn sgr_is_absolute() {
        assert_eq!(sgr(Style::default()), "\x1b[0m");
        assert_eq!(
            sgr(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            "\x1b[0;1;31m"
        );
        assert_eq!(
            sgr(Style::default().fg(Color::Indexed(255)).bg(Color::Indexed(235))),
            "\x1b[0;38;5;255;48;5;235m"
        );
        assert_eq!(sgr(Style::default().bg(Color::LightBlue)), "\x1b[0;104m");
        assert_eq!(sgr(Style::default().fg(Color::Rgb(1, 2, 3))), "\x1b[0;38;2;1;2;3m");
    }

    #[test]
    fn plain_buffer_flattens_row_by_row() {
        let buf = Buffer::with_lines(["ab", "cd"]);
        assert_eq!(buffer_to_ansi(&buf), "\x1b[0mab\x1b[0m\n\x1b[0mcd\x1b[0m");
    }

    #[test]
    fn style_changes_emit_sequences() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        buf.set_string(1, 0, "x", Style::default().fg(Color::Green));
        assert_eq!(buffer_to_ansi(&buf), "\x1b[0m \x1b[0;32mx\x1b[0m \x1b[0m");
    }

    #[test]
    fn wide_glyphs_are_not_doubled() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        buf.set_string(0, 0, "日x", Style::default());
        assert_eq!(buffer_to_ansi(&buf), "\x1b[0m日x \x1b[0m");
    }

    #[test]
    fn ansi_lines_carry_style_across_breaks() {
        let lines = ansi_to_lines("\x1b[1mhi\x1b[0m there\n\x1b[31mred\nstill");
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            Line::from(vec![
                Span::styled("hi", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" there"),
            ])
        );
        assert_eq!(lines[1], Line::from(Span::styled("red", Style::default().fg(Color::Red))));
        assert_eq!(lines[2], Line::from(Span::styled("still", Style::default().fg(Color::Red))));
    }

    #[test]
    fn extended_colours_and_resets_parse() {
        let lines = ansi_to_lines("\x1b[38;5;214;48;2;1;2;3mx\x1b[39my\x1b[mz");
        let spans = &lines[0].spans;
        assert_eq!(
            spans[0].style,
            Style::default().fg(Color::Indexed(214)).bg(Color::Rgb(1, 2, 3))
        );
        assert_eq!(spans[1].style, Style::default().bg(Color::Rgb(1, 2, 3)));
        assert_eq!(spans[2].style, Style::default());
    }

    #[test]
    fn buffer_survives_the_round_trip() {
        let area = Rect::new(0, 0, 8, 2);
        let mut original = Buffer::empty(area);
        original.set_string(0, 0, "ab", Style::default().fg(Color::Indexed(45)));
        original.set_string(2, 0, "日", Style::default().add_modifier(Modifier::BOLD));
        original.set_string(0, 1, "plain", Style::default().bg(Color::Blue));

        let mut rebuilt = Buffer::empty(area);
        Paragraph::new(ansi_to_lines(&buffer_to_ansi(&original))).render(area, &mut rebuilt);

        assert_eq!(rebuilt, original);
    }
}
