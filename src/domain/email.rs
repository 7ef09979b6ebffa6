use chrono::{DateTime, Local, Utc};

/// Opaque storage key; unique within a bucket/prefix.
pub type ObjectKey = String;

/// One stored message, decoded. Replaced wholesale on reload and removed
/// wholesale on confirmed deletion; never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: DateTime<Utc>,
    /// Markdown (converted from HTML) or plain text.
    pub body: String,
    pub key: ObjectKey,
}

impl Email {
    pub fn date_label(&self) -> String {
        self.date
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}
