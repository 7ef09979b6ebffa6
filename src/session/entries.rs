use crate::domain::email::Email;

/// One row of the active list, whichever kind of list it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Bucket(&'a str),
    Email(&'a Email),
}

impl Entry<'_> {
    /// Cell texts in column order.
    pub fn cells(&self) -> Vec<String> {
        match self {
            Entry::Bucket(name) => vec![name.to_string()],
            Entry::Email(e) => vec![
                e.from.clone(),
                e.to.clone(),
                e.subject.clone(),
                e.date_label(),
            ],
        }
    }
}
