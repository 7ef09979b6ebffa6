use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{
        Block, BorderType, Clear, List, ListItem, ListState, Padding, Paragraph, Row, Table,
        TableState, Widget,
    },
};

use crate::compose::{EMAIL_COLUMNS, ansi_to_lines, buffer_to_ansi, column_widths, place_overlay};
use crate::session::{Screen, Session};
use crate::terminal::theme;

pub const TITLE: &str = "🌌 Smailer: S3 Inbox Reader 🚀";

const BUCKET_HELP: &str = "↑/↓: navigate • enter: select • r: reload • q: quit";
const LIST_HELP: &str =
    "↑/↓: navigate • enter: read • d: delete • r: refresh • esc: back • q: quit";
const VIEW_HELP: &str = "↑/↓: scroll • esc/q: back • d: delete";

const GLOBE: [&str; 3] = ["🌍", "🌎", "🌏"];
const STAR_FIELD: [&str; 6] = [
    "   .    '     *     .      *    .     '",
    "     .      .     *    .    '   *     .",
    "*  .     *     .    '    .      *    .",
    "   '    .     *     .    *    .     '",
    ".     *    .      *     .     '     *",
    "     .    '     .     *    .      *    .",
];

/// Frame border plus inner padding, then one gap per column boundary.
const TABLE_GUTTER: u16 = 4 + 5;

pub const MODAL_WIDTH: u16 = 42;
pub const MODAL_HEIGHT: u16 = 8;
const CONFIRM_TEXT: [&str; 4] = [
    "Delete this email?",
    "",
    "Press y to confirm,",
    "n or esc to cancel.",
];
const DELETING_TEXT: [&str; 4] = ["Delete this email?", "", "Deleting...", ""];

pub fn draw(f: &mut Frame, session: &Session, spinner: usize) {
    let [title, content, help, message] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    f.render_widget(
        Paragraph::new(TITLE)
            .style(theme::title())
            .alignment(Alignment::Center),
        title,
    );

    // the modal sits on top of whatever it was opened from
    let base = match session.screen {
        Screen::ConfirmDelete => session.return_screen,
        other => other,
    };
    let hint = match base {
        Screen::BucketSelection => {
            draw_buckets(f, session, content, spinner);
            Line::styled(BUCKET_HELP, theme::help())
        }
        Screen::View => {
            draw_view(f, session, content);
            Line::styled(VIEW_HELP, theme::help())
        }
        _ => {
            draw_list(f, session, content, spinner);
            let mut spans = vec![Span::styled(list_help(session), theme::help())];
            if let Some(status) = &session.status {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(status.clone(), theme::status()));
            }
            Line::from(spans)
        }
    };
    f.render_widget(Paragraph::new(hint), help);

    if let Some(err) = &session.error {
        f.render_widget(
            Paragraph::new(Line::styled(format!("Error: {err}"), theme::error())),
            message,
        );
    }

    if session.screen == Screen::ConfirmDelete {
        overlay_modal(f, session.deleting);
    }
}

/// Key hints plus the message count and pagination state.
pub fn list_help(session: &Session) -> String {
    let mut help = format!("{LIST_HELP} • {} emails", session.emails.len());
    if session.has_more {
        help.push_str(" (more available)");
    }
    if session.loading {
        help.push_str(" (loading more...)");
    }
    help
}

fn frame_block() -> Block<'static> {
    Block::bordered()
        .border_style(theme::border())
        .padding(Padding::horizontal(1))
}

fn draw_buckets(f: &mut Frame, session: &Session, area: Rect, spinner: usize) {
    let block = frame_block().title(" Select a Bucket ");
    if session.buckets.is_empty() {
        let text = if session.loading {
            splash(spinner, "Loading buckets...")
        } else {
            Text::styled("No buckets found", theme::help())
        };
        centered(f, block, text, area);
        return;
    }

    let items: Vec<ListItem> = session
        .entries()
        .into_iter()
        .map(|e| ListItem::new(e.cells().concat()))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(theme::selected());
    let mut state = ListState::default().with_selected(Some(session.bucket_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_list(f: &mut Frame, session: &Session, area: Rect, spinner: usize) {
    let block = frame_block();
    if session.emails.is_empty() {
        let text = if session.loading {
            splash(spinner, "Loading emails...")
        } else {
            Text::styled("No emails found", theme::help())
        };
        centered(f, block, text, area);
        return;
    }

    let widths = column_widths(area.width.saturating_sub(TABLE_GUTTER), &EMAIL_COLUMNS);
    let header = Row::new(EMAIL_COLUMNS.iter().map(|c| c.title)).style(theme::header());
    let rows: Vec<Row> = session
        .entries()
        .into_iter()
        .map(|e| Row::new(e.cells()))
        .collect();
    let table = Table::new(rows, widths.into_iter().map(Constraint::Length))
        .header(header)
        .block(block)
        .row_highlight_style(theme::selected());
    let mut state = TableState::default().with_selected(Some(session.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_view(f: &mut Frame, session: &Session, area: Rect) {
    let Some(email) = session.selected_email() else {
        return;
    };
    let [header, body] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<9}"), theme::header()),
            Span::raw(value),
        ])
    };
    let lines = vec![
        field("From:", email.from.clone()),
        field("To:", email.to.clone()),
        field("Subject:", email.subject.clone()),
        field("Date:", email.date_label()),
    ];
    f.render_widget(Paragraph::new(lines), header);

    // rows arrive pre-wrapped so the scroll bound matches what is drawn
    let viewport = Paragraph::new(ansi_to_lines(&session.body_lines.join("\n")))
        .block(Block::bordered().border_style(theme::border()))
        .scroll((session.body_scroll, 0));
    f.render_widget(viewport, body);
}

fn splash(spinner: usize, label: &str) -> Text<'static> {
    let mut lines: Vec<Line> = STAR_FIELD
        .iter()
        .map(|l| Line::styled(*l, Style::default().fg(theme::ACCENT)))
        .collect();
    lines.push(Line::default());
    lines.push(Line::raw(format!("{} {label}", GLOBE[spinner % GLOBE.len()])));
    Text::from(lines)
}

fn centered(f: &mut Frame, block: Block, text: Text, area: Rect) {
    let inner = block.inner(area);
    f.render_widget(block, area);
    let height = text.height() as u16;
    let [middle] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(inner);
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), middle);
}

/// The confirmation dialog, drawn on its own.
pub fn modal_buffer(deleting: bool) -> Buffer {
    let area = Rect::new(0, 0, MODAL_WIDTH, MODAL_HEIGHT);
    let mut buf = Buffer::empty(area);
    let text = if deleting { DELETING_TEXT } else { CONFIRM_TEXT };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .padding(Padding::new(2, 2, 1, 1));
    Paragraph::new(text.map(Line::raw).to_vec())
        .block(block)
        .style(theme::modal())
        .render(area, &mut buf);
    buf
}

/// Flattens the drawn frame, splices the dialog into its centre and
/// redraws the result.
fn overlay_modal(f: &mut Frame, deleting: bool) {
    let area = f.area();
    let base = buffer_to_ansi(f.buffer_mut());
    let modal = buffer_to_ansi(&modal_buffer(deleting));
    let x = area.width.saturating_sub(MODAL_WIDTH) / 2;
    let y = area.height.saturating_sub(MODAL_HEIGHT) / 2;
    let composed = place_overlay(x.into(), y.into(), &modal, &base);

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(ansi_to_lines(&composed)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use ratatui::{Terminal, backend::TestBackend};

    use crate::domain::email::Email;
    use crate::ingest::Page;
    use crate::render::AnsiMarkdown;
    use crate::session::{Event, Input};

    const W: u16 = 100;
    const H: u16 = 30;

    fn screen_text(session: &Session) -> Vec<String> {
        sized_screen_text(session, W, H)
    }

    fn sized_screen_text(session: &Session, w: u16, h: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal.draw(|f| draw(f, session, 0)).unwrap();
        let buf = terminal.backend().buffer();
        (0..h)
            .map(|y| (0..w).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    fn session_with(subjects: &[&str], loading: bool) -> Session {
        let mut s = Session::new(Some("inbox".into()), "inbound/".into(), Arc::new(AnsiMarkdown));
        s.update(Event::Resize {
            width: W,
            height: H,
        });
        s.init();
        if !loading {
            let emails = subjects
                .iter()
                .enumerate()
                .map(|(i, subject)| Email {
                    from: "alice@example.com".into(),
                    to: "bob@example.com".into(),
                    subject: subject.to_string(),
                    date: Utc.with_ymd_and_hms(2025, 2, 10 - i as u32, 8, 0, 0).unwrap(),
                    body: format!("# {subject}"),
                    key: format!("inbound/{i}"),
                })
                .collect();
            let ticket = s.ticket();
            s.update(Event::PageLoaded {
                ticket,
                result: Ok(Page {
                    emails,
                    next_cursor: None,
                    has_more: false,
                }),
            });
        }
        s
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    #[test]
    fn help_counts_messages_and_pages() {
        let mut s = session_with(&["a", "b"], false);
        assert!(list_help(&s).ends_with("• 2 emails"));
        s.has_more = true;
        s.loading = true;
        assert!(list_help(&s).ends_with("2 emails (more available) (loading more...)"));
    }

    #[test]
    fn empty_inbox_says_so() {
        let lines = screen_text(&session_with(&[], false));
        assert!(contains(&lines, "No emails found"));
    }

    #[test]
    fn first_load_shows_the_splash() {
        let lines = screen_text(&session_with(&[], true));
        assert!(contains(&lines, "Loading emails..."));
    }

    #[test]
    fn list_shows_rows_and_header() {
        let lines = screen_text(&session_with(&["Quarterly report", "Lunch"], false));
        assert!(contains(&lines, "Subject"));
        assert!(contains(&lines, "Quarterly report"));
        assert!(contains(&lines, "2 emails"));
    }

    #[test]
    fn view_shows_the_header_fields() {
        let mut s = session_with(&["Quarterly report"], false);
        s.update(Event::Key(Input::Open));
        let lines = screen_text(&s);
        assert!(contains(&lines, "From:    alice@example.com"));
        assert!(contains(&lines, "Subject: Quarterly report"));
    }

    #[test]
    fn bottom_of_a_narrow_view_shows_the_last_line() {
        let mut s = session_with(&["long"], false);
        let mut body = vec!["aaaaaaaaaaaaaa5 bbbbbbbbbbbbbbb cccccc"; 10];
        body.push("THE-END");
        s.emails[0].body = body.join("\n");
        s.update(Event::Resize {
            width: 22,
            height: 16,
        });
        s.update(Event::Key(Input::Open));
        s.update(Event::Key(Input::Bottom));

        let lines = sized_screen_text(&s, 22, 16);
        assert!(contains(&lines, "THE-END"), "{lines:#?}");
    }

    #[test]
    fn modal_is_composited_over_the_list() {
        let mut s = session_with(&["one", "two"], false);
        let before = screen_text(&s);
        s.update(Event::Key(Input::Delete));
        let after = screen_text(&s);

        let top = usize::from((H - MODAL_HEIGHT) / 2);
        let bottom = top + usize::from(MODAL_HEIGHT);
        assert!(after[top].contains('╭'));
        assert!(contains(&after[top..bottom], "Delete this email?"));
        assert!(contains(&after[top..bottom], "n or esc to cancel."));
        assert_eq!(before[..top], after[..top]);
        assert_eq!(before[bottom..], after[bottom..]);
    }

    #[test]
    fn modal_buffer_has_the_fixed_size() {
        let buf = modal_buffer(false);
        assert_eq!(buf.area, Rect::new(0, 0, MODAL_WIDTH, MODAL_HEIGHT));
        assert_eq!(buf[(0, 0)].symbol(), "╭");
    }
}
