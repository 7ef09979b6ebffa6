pub mod decoders;

use chrono::{DateTime, Utc};
use mailparse::MailHeaderMap;

use crate::domain::email::Email;
use decoders::{find_part, html_to_markdown};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed MIME envelope: {0}")]
    Parse(#[from] mailparse::MailParseError),
    #[error("HTML conversion failed: {0}")]
    Conversion(String),
}

/// Decodes one stored object into an [`Email`].
///
/// A missing or unparsable `Date` header falls back to the current time; an
/// HTML body is preferred (as Markdown) and degrades to the plain-text part
/// when conversion fails.
pub fn decode_email(key: &str, raw: &[u8]) -> Result<Email, DecodeError> {
    let parsed = mailparse::parse_mail(raw)?;

    let header = |name: &str| {
        parsed
            .headers
            .get_first_value(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let date = parsed
        .headers
        .get_first_value("Date")
        .and_then(|d| parse_date(&d))
        .unwrap_or_else(Utc::now);

    let text = find_part(&parsed, "text/plain").unwrap_or_default();
    let body = match find_part(&parsed, "text/html").filter(|h| !h.trim().is_empty()) {
        Some(html) => match html_to_markdown(&html) {
            Ok(md) => md,
            Err(e) => {
                log::debug!("{key}: {e}; using text part");
                text
            }
        },
        None => text,
    };

    Ok(Email {
        from: header("From"),
        to: header("To"),
        subject: header("Subject"),
        date,
        body,
        key: key.to_string(),
    })
}

/// RFC 2822 first, then mailparse's lenient parser for near-misses. The
/// lenient parser maps text without any numbers to the epoch, so such
/// headers are rejected outright.
fn parse_date(header: &str) -> Option<DateTime<Utc>> {
    let header = header.trim();
    if let Ok(d) = DateTime::parse_from_rfc2822(header) {
        return Some(d.with_timezone(&Utc));
    }
    if !header.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    mailparse::dateparse(header)
        .ok()
        .filter(|&epoch| epoch > 0)
        .and_then(|epoch| DateTime::<Utc>::from_timestamp(epoch, 0))
}
