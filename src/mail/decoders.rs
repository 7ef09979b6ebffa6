use mailparse::{DispositionType, ParsedMail};

use super::DecodeError;

/// Column budget handed to html2text; the viewer wraps again at draw time.
const HTML_WRAP_WIDTH: usize = 120;

/// Depth-first search for the first inline part of the given MIME type.
pub fn find_part(p: &ParsedMail, mimetype: &str) -> Option<String> {
    if matches!(
        p.get_content_disposition().disposition,
        DispositionType::Attachment
    ) {
        return None;
    }

    if p.subparts.is_empty() {
        if p.ctype.mimetype.eq_ignore_ascii_case(mimetype) {
            return p.get_body().ok();
        }
        return None;
    }

    p.subparts.iter().find_map(|sp| find_part(sp, mimetype))
}

/// HTML to Markdown-flavoured text (headings, emphasis, link references).
pub fn html_to_markdown(html: &str) -> Result<String, DecodeError> {
    html2text::from_read(html.as_bytes(), HTML_WRAP_WIDTH)
        .map_err(|e| DecodeError::Conversion(e.to_string()))
}
