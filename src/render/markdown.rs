//! Markdown to ANSI-styled text.

use anyhow::{Result, anyhow};
use markdown::mdast::Node;
use markdown::{ParseOptions, to_mdast};

use super::BodyRenderer;

const RESET: &str = "\x1b[0m";
const HEADING: &str = "\x1b[1;38;5;45m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const ITALIC: &str = "\x1b[3m";
const UNDERLINE: &str = "\x1b[4m";
const STRIKE: &str = "\x1b[9m";
const CODE: &str = "\x1b[38;5;214m";
const BULLET: &str = "\x1b[38;5;99m";

const RULE_WIDTH: usize = 40;

#[derive(Debug, Default, Clone, Copy)]
pub struct AnsiMarkdown;

impl BodyRenderer for AnsiMarkdown {
    fn render(&self, source: &str) -> Result<String> {
        let root = to_mdast(source, &ParseOptions::gfm()).map_err(|m| anyhow!("markdown: {m}"))?;
        let lines = match root.children() {
            Some(children) => blocks(children),
            None => Vec::new(),
        };
        Ok(lines.join("\n"))
    }
}

fn paint(s: &str, code: &str) -> String {
    format!("{code}{s}{RESET}")
}

fn split_lines(s: &str) -> Vec<String> {
    s.split('\n').map(str::to_string).collect()
}

/// Top-level or nested blocks, separated by one blank line.
fn blocks(nodes: &[Node]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(block(node));
    }
    lines
}

/// Blocks without separators (list item content).
fn tight(nodes: &[Node]) -> Vec<String> {
    nodes.iter().flat_map(block).collect()
}

fn block(node: &Node) -> Vec<String> {
    match node {
        Node::Heading(h) => {
            let text = format!("{} {}", "#".repeat(h.depth as usize), inline(&h.children));
            split_lines(&text).iter().map(|l| paint(l, HEADING)).collect()
        }
        Node::Paragraph(p) => split_lines(&inline(&p.children)),
        Node::ThematicBreak(_) => vec![paint(&"─".repeat(RULE_WIDTH), DIM)],
        Node::Code(c) => c.value.lines().map(|l| format!("  {}", paint(l, CODE))).collect(),
        Node::Blockquote(q) => blocks(&q.children)
            .into_iter()
            .map(|l| format!("{} {l}", paint("│", DIM)))
            .collect(),
        Node::List(list) => {
            let start = list.start.unwrap_or(1) as usize;
            let mut lines = Vec::new();
            for (n, item) in list.children.iter().enumerate() {
                let marker = if list.ordered {
                    format!("{}. ", start + n)
                } else {
                    "• ".to_string()
                };
                let pad = " ".repeat(marker.chars().count());
                let body = match item {
                    Node::ListItem(li) => tight(&li.children),
                    other => block(other),
                };
                if body.is_empty() {
                    lines.push(paint(&marker, BULLET));
                }
                for (j, l) in body.into_iter().enumerate() {
                    if j == 0 {
                        lines.push(format!("{}{l}", paint(&marker, BULLET)));
                    } else {
                        lines.push(format!("{pad}{l}"));
                    }
                }
            }
            lines
        }
        Node::Table(t) => t
            .children
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let cells = row
                    .children()
                    .map(|cells| {
                        cells
                            .iter()
                            .map(|c| c.children().map(|ch| inline(ch)).unwrap_or_default())
                            .collect::<Vec<_>>()
                            .join(" │ ")
                    })
                    .unwrap_or_default();
                if r == 0 { paint(&cells, BOLD) } else { cells }
            })
            .collect(),
        Node::Html(h) => h.value.lines().map(|l| paint(l, DIM)).collect(),
        other => match other.children() {
            Some(children) => blocks(children),
            None => split_lines(&inline(std::slice::from_ref(other))),
        },
    }
}

fn inline(nodes: &[Node]) -> String {
    let mut out = String::new();
    let mut stack = Vec::new();
    inline_into(nodes, &mut out, &mut stack);
    out
}

fn inline_into(nodes: &[Node], out: &mut String, stack: &mut Vec<&'static str>) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(&t.value),
            Node::Strong(s) => styled(out, stack, BOLD, |o, st| inline_into(&s.children, o, st)),
            Node::Emphasis(e) => styled(out, stack, ITALIC, |o, st| inline_into(&e.children, o, st)),
            Node::Delete(d) => styled(out, stack, STRIKE, |o, st| inline_into(&d.children, o, st)),
            Node::InlineCode(c) => styled(out, stack, CODE, |o, _| o.push_str(&c.value)),
            Node::Link(l) => {
                let label = inline(&l.children);
                styled(out, stack, UNDERLINE, |o, st| inline_into(&l.children, o, st));
                if !l.url.is_empty() && label != l.url {
                    out.push_str(&format!(" ({})", l.url));
                }
            }
            Node::Image(i) => out.push_str(&format!("[image: {}]", i.alt)),
            Node::Break(_) => out.push('\n'),
            Node::Html(h) => out.push_str(&h.value),
            other => {
                if let Some(children) = other.children() {
                    inline_into(children, out, stack);
                }
            }
        }
    }
}

/// Wraps `body` in `code`, then restores the enclosing styles.
fn styled<F>(out: &mut String, stack: &mut Vec<&'static str>, code: &'static str, body: F)
where
    F: FnOnce(&mut String, &mut Vec<&'static str>),
{
    out.push_str(code);
    stack.push(code);
    body(out, stack);
    stack.pop();
    out.push_str(RESET);
    for outer in stack.iter() {
        out.push_str(outer);
    }
}
