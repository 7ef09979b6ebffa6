use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use smailer::ingest::fetch_page;
use smailer::render::AnsiMarkdown;
use smailer::session::{Effect, Event, Input, Screen, Session};
use smailer::store::ObjectStore;
use smailer::store::memory::MemoryStore;

const BUCKET: &str = "mail-ses-inbound";

fn mime(i: usize) -> String {
    let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i as i64);
    format!(
        "From: sender{i}@example.com\r\nTo: me@example.com\r\nSubject: message {i}\r\nDate: {}\r\nContent-Type: text/plain\r\n\r\nbody {i}",
        date.to_rfc2822()
    )
}

fn inbox(count: usize) -> MemoryStore {
    (0..count).fold(MemoryStore::new(&["logs", BUCKET]), |store, i| {
        store.with_object(BUCKET, &format!("inbound/msg-{i:02}"), mime(i))
    })
}

/// Runs effects to completion against `store`, feeding each completion
/// back into the session. Status timers are returned instead of fired.
async fn settle(session: &mut Session, store: &MemoryStore, effects: Vec<Effect>) -> Vec<u64> {
    let mut queue: VecDeque<Effect> = effects.into();
    let mut timers = Vec::new();
    while let Some(effect) = queue.pop_front() {
        let event = match effect {
            Effect::ListBuckets { ticket } => Event::BucketsLoaded {
                ticket,
                result: store.list_buckets().await,
            },
            Effect::FetchPage { ticket, request } => Event::PageLoaded {
                ticket,
                result: fetch_page(store, &request).await,
            },
            Effect::Delete {
                ticket,
                bucket,
                key,
            } => Event::Deleted {
                ticket,
                result: store.delete_object(&bucket, &key).await,
                key,
            },
            Effect::ClearStatusAfter { serial, .. } => {
                timers.push(serial);
                continue;
            }
            Effect::Quit => continue,
        };
        queue.extend(session.update(event));
    }
    timers
}

async fn press(session: &mut Session, store: &MemoryStore, input: Input) -> Vec<u64> {
    let effects = session.update(Event::Key(input));
    settle(session, store, effects).await
}

fn subjects(session: &Session) -> Vec<String> {
    session.emails.iter().map(|e| e.subject.clone()).collect()
}

async fn started(store: &MemoryStore) -> Session {
    let mut session = Session::new(None, "inbound/".into(), Arc::new(AnsiMarkdown));
    let effects = session.init();
    settle(&mut session, store, effects).await;
    session
}

#[tokio::test]
async fn auto_selected_bucket_pages_in_newest_first() {
    let store = inbox(25);
    let mut session = started(&store).await;

    assert_eq!(session.screen, Screen::List);
    assert_eq!(session.bucket.as_deref(), Some(BUCKET));
    assert_eq!(session.emails.len(), 10);
    assert!(session.has_more);

    // walk to the bottom; each arrival on the last row pulls one more page
    while session.has_more {
        press(&mut session, &store, Input::Bottom).await;
    }
    assert_eq!(session.emails.len(), 25);
    assert!(session.continuation.is_none());

    let expected: Vec<String> = (0..25).rev().map(|i| format!("message {i}")).collect();
    assert_eq!(subjects(&session), expected);
}

#[tokio::test]
async fn unreadable_objects_are_skipped() {
    let store = inbox(3).with_unreadable("inbound/msg-01");
    let session = started(&store).await;
    assert_eq!(subjects(&session), ["message 2", "message 0"]);
    assert!(session.error.is_none());
}

#[tokio::test]
async fn delete_from_view_removes_the_object() {
    let store = inbox(3);
    let mut session = started(&store).await;

    press(&mut session, &store, Input::Open).await;
    assert_eq!(session.screen, Screen::View);
    press(&mut session, &store, Input::Delete).await;
    assert_eq!(session.screen, Screen::ConfirmDelete);

    let timers = press(&mut session, &store, Input::Confirm).await;
    assert!(!store.contains(BUCKET, "inbound/msg-02"));
    assert_eq!(subjects(&session), ["message 1", "message 0"]);
    assert_eq!(session.screen, Screen::View);
    assert_eq!(
        session.selected_email().map(|e| e.subject.as_str()),
        Some("message 1")
    );
    assert_eq!(session.status.as_deref(), Some("Email deleted"));

    for serial in timers {
        session.update(Event::StatusExpired { serial });
    }
    assert!(session.status.is_none());
}

#[tokio::test]
async fn failed_delete_leaves_everything_in_place() {
    let store = inbox(2).failing_delete();
    let mut session = started(&store).await;

    press(&mut session, &store, Input::Delete).await;
    press(&mut session, &store, Input::Confirm).await;

    assert_eq!(session.emails.len(), 2);
    assert_eq!(session.screen, Screen::ConfirmDelete);
    assert!(session.error.as_deref().is_some_and(|e| e.contains("forbidden")));

    press(&mut session, &store, Input::Cancel).await;
    assert_eq!(session.screen, Screen::List);
    assert!(session.error.is_none());
}

#[tokio::test]
async fn refresh_discards_a_page_already_in_flight() {
    let store = inbox(15);
    let mut session = started(&store).await;

    // request the second page but hold on to it
    let prefetch = session.update(Event::Key(Input::Bottom));
    assert_eq!(prefetch.len(), 1);

    press(&mut session, &store, Input::Refresh).await;
    assert_eq!(session.emails.len(), 10);

    settle(&mut session, &store, prefetch).await;
    assert_eq!(session.emails.len(), 10, "the stale page was not merged");
}

#[tokio::test]
async fn listing_failure_is_reported_not_fatal() {
    let store = MemoryStore::new(&["logs"]).failing_listing();
    let session = started(&store).await;
    assert_eq!(session.screen, Screen::BucketSelection);
    assert_eq!(session.error.as_deref(), Some("access denied"));
    assert!(!session.loading);
}

#[tokio::test]
async fn back_returns_to_the_bucket_list() {
    let store = inbox(2);
    let mut session = started(&store).await;

    press(&mut session, &store, Input::Back).await;

    // one "ses" bucket again means straight back into it
    assert_eq!(session.screen, Screen::List);
    assert_eq!(session.emails.len(), 2);
}
