//! Paginated ingestion: one listing page under bucket/prefix, each object
//! fetched and decoded, then merged into the session's newest-first list.

use anyhow::Result;

use crate::domain::email::Email;
use crate::mail::decode_email;
use crate::store::ObjectStore;

pub const PAGE_SIZE: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub bucket: String,
    pub prefix: String,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub emails: Vec<Email>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Fetches and decodes one page. A failing listing aborts the page; a
/// failing fetch or decode only skips that object.
pub async fn fetch_page(store: &dyn ObjectStore, req: &PageRequest) -> Result<Page> {
    let listing = store
        .list_objects(&req.bucket, &req.prefix, PAGE_SIZE, req.cursor.as_deref())
        .await?;

    let mut emails = Vec::with_capacity(listing.keys.len());
    for key in &listing.keys {
        let raw = match store.get_object(&req.bucket, key).await {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("skipping {key}: {e:#}");
                continue;
            }
        };
        match decode_email(key, &raw) {
            Ok(email) => emails.push(email),
            Err(e) => log::debug!("skipping {key}: {e}"),
        }
    }

    let (next_cursor, has_more) = if listing.is_truncated {
        (listing.next_continuation_token, true)
    } else {
        (None, false)
    };

    Ok(Page {
        emails,
        next_cursor,
        has_more,
    })
}

/// Appends a page and re-sorts everything newest-first. The sort is stable,
/// so equal dates keep their arrival order.
pub fn merge_page(emails: &mut Vec<Email>, page: Vec<Email>) {
    emails.extend(page);
    emails.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn mime(subject: &str, day: u32) -> String {
        format!(
            "From: a@b.com\r\nTo: c@d.com\r\nSubject: {subject}\r\nDate: {}\r\nContent-Type: text/plain\r\n\r\nbody of {subject}",
            Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap().to_rfc2822()
        )
    }

    fn email(subject: &str, day: u32) -> Email {
        Email {
            from: String::new(),
            to: String::new(),
            subject: subject.to_string(),
            date: Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap(),
            body: String::new(),
            key: subject.to_string(),
        }
    }

    fn request(cursor: Option<&str>) -> PageRequest {
        PageRequest {
            bucket: "mail".into(),
            prefix: "inbound/".into(),
            cursor: cursor.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn pages_through_prefix_with_continuation() {
        let mut store = MemoryStore::new(&["mail"]).with_object("mail", "other/x", mime("x", 1));
        for i in 0..12 {
            store = store.with_object("mail", &format!("inbound/{i:02}"), mime(&format!("m{i}"), i + 1));
        }

        let first = fetch_page(&store, &request(None)).await.unwrap();
        assert_eq!(first.emails.len(), 10);
        assert!(first.has_more);
        let cursor = first.next_cursor.clone().unwrap();

        let second = fetch_page(&store, &request(Some(&cursor))).await.unwrap();
        assert_eq!(second.emails.len(), 2);
        assert!(!second.has_more);
        assert_eq!(second.next_cursor, None);
        assert!(second.emails.iter().all(|e| e.key.starts_with("inbound/")));
    }

    #[tokio::test]
    async fn unreadable_objects_are_skipped() {
        let store = MemoryStore::new(&["mail"])
            .with_object("mail", "inbound/a", mime("a", 1))
            .with_object("mail", "inbound/b", mime("b", 2))
            .with_unreadable("inbound/b");

        let page = fetch_page(&store, &request(None)).await.unwrap();
        assert_eq!(page.emails.len(), 1);
        assert_eq!(page.emails[0].subject, "a");
    }

    #[tokio::test]
    async fn listing_failure_fails_the_page() {
        let store = MemoryStore::new(&["mail"]).failing_listing();
        let err = fetch_page(&store, &request(None)).await.unwrap_err();
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn merge_sorts_newest_first() {
        let mut emails = vec![email("old", 2)];
        merge_page(&mut emails, vec![email("newer", 20), email("oldest", 1)]);
        let order: Vec<_> = emails.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(order, ["newer", "old", "oldest"]);
    }

    #[test]
    fn merge_keeps_arrival_order_for_equal_dates() {
        let mut emails = vec![email("a", 5), email("b", 5)];
        merge_page(&mut emails, vec![email("c", 5), email("d", 9), email("e", 5)]);
        let order: Vec<_> = emails.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(order, ["d", "a", "b", "c", "e"]);
    }
}
