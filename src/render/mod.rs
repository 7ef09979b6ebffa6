pub mod markdown;

use anyhow::Result;

pub use markdown::AnsiMarkdown;

/// Turns a message body (Markdown) into styled terminal text.
pub trait BodyRenderer: Send + Sync {
    fn render(&self, source: &str) -> Result<String>;
}
