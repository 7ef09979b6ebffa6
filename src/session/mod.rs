//! The interaction state machine.
//!
//! `Session` is plain data plus a transition function: every user input,
//! resize, timer and storage completion arrives as an [`Event`], mutates the
//! session synchronously, and yields the [`Effect`]s to run next. Nothing
//! in here performs I/O.

pub mod buckets;
pub mod entries;
pub mod event;

use std::sync::Arc;

use crate::compose::wrap;
use crate::domain::email::{Email, ObjectKey};
use crate::ingest::{Page, PageRequest, merge_page};
use crate::render::BodyRenderer;

pub use entries::Entry;
pub use event::{Effect, Event, Input, STATUS_DELAY, Ticket};

/// Rows the View screen spends on everything but the body.
pub const VIEW_CHROME: u16 = 9;
/// Rows the List screen spends on everything but table rows.
pub const LIST_CHROME: u16 = 6;

pub const DELETED_STATUS: &str = "Email deleted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    BucketSelection,
    List,
    View,
    ConfirmDelete,
}

/// The message a confirmation dialog is asking about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub index: usize,
    pub key: ObjectKey,
}

pub struct Session {
    pub screen: Screen,
    /// Where ConfirmDelete goes back to.
    pub return_screen: Screen,

    pub bucket: Option<String>,
    pub prefix: String,
    pub buckets: Vec<String>,
    pub bucket_cursor: usize,

    /// Newest first.
    pub emails: Vec<Email>,
    /// Highlighted row in the list.
    pub cursor: usize,
    /// Message open in View.
    pub selected: Option<usize>,
    pub pending_delete: Option<PendingDelete>,

    pub continuation: Option<String>,
    pub has_more: bool,
    pub loading: bool,
    pub deleting: bool,
    pub generation: u64,

    pub error: Option<String>,
    pub status: Option<String>,
    pub status_serial: u64,

    /// Rendered body of the selected message.
    pub body: String,
    /// `body` wrapped to the viewport; what the View draws and scrolls.
    pub body_lines: Vec<String>,
    pub body_scroll: u16,

    pub width: u16,
    pub height: u16,

    renderer: Arc<dyn BodyRenderer>,
}

impl Session {
    pub fn new(bucket: Option<String>, prefix: String, renderer: Arc<dyn BodyRenderer>) -> Self {
        let screen = if bucket.is_some() {
            Screen::List
        } else {
            Screen::BucketSelection
        };
        Self {
            screen,
            return_screen: Screen::List,
            bucket,
            prefix,
            buckets: Vec::new(),
            bucket_cursor: 0,
            emails: Vec::new(),
            cursor: 0,
            selected: None,
            pending_delete: None,
            continuation: None,
            has_more: true,
            loading: false,
            deleting: false,
            generation: 0,
            error: None,
            status: None,
            status_serial: 0,
            body: String::new(),
            body_lines: Vec::new(),
            body_scroll: 0,
            width: 80,
            height: 24,
            renderer,
        }
    }

    /// The first request: a page of the preselected bucket, or the bucket
    /// listing.
    pub fn init(&mut self) -> Vec<Effect> {
        match self.screen {
            Screen::List => self.start_ingest(),
            _ => self.start_bucket_listing(),
        }
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation)
    }

    /// Rows of the list that is currently meaningful.
    pub fn entries(&self) -> Vec<Entry<'_>> {
        match self.screen {
            Screen::BucketSelection => self.buckets.iter().map(|b| Entry::Bucket(b)).collect(),
            _ => self.emails.iter().map(Entry::Email).collect(),
        }
    }

    pub fn selected_email(&self) -> Option<&Email> {
        self.selected.and_then(|i| self.emails.get(i))
    }

    pub fn list_rows(&self) -> u16 {
        self.height.saturating_sub(LIST_CHROME).max(1)
    }

    pub fn body_rows(&self) -> u16 {
        self.height.saturating_sub(VIEW_CHROME).max(1)
    }

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Key(input) => {
                self.error = None;
                self.on_key(input)
            }
            Event::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.rewrap();
                Vec::new()
            }
            Event::BucketsLoaded { ticket, result } => {
                if self.is_stale(ticket) {
                    return Vec::new();
                }
                self.loading = false;
                match result {
                    Ok(names) => self.on_buckets(names),
                    Err(e) => {
                        log::warn!("bucket listing failed: {e:#}");
                        self.error = Some(format!("{e:#}"));
                        Vec::new()
                    }
                }
            }
            Event::PageLoaded { ticket, result } => {
                if self.is_stale(ticket) {
                    return Vec::new();
                }
                self.loading = false;
                match result {
                    Ok(page) => self.on_page(page),
                    Err(e) => {
                        log::warn!("page fetch failed: {e:#}");
                        self.error = Some(format!("{e:#}"));
                    }
                }
                Vec::new()
            }
            Event::Deleted {
                ticket,
                key,
                result,
            } => {
                if self.is_stale(ticket) {
                    return Vec::new();
                }
                self.deleting = false;
                match result {
                    Ok(()) => self.on_deleted(&key),
                    Err(e) => {
                        log::warn!("delete of {key} failed: {e:#}");
                        self.error = Some(format!("{e:#}"));
                        Vec::new()
                    }
                }
            }
            Event::StatusExpired { serial } => {
                if serial == self.status_serial {
                    self.status = None;
                }
                Vec::new()
            }
        }
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        let stale = ticket != self.ticket();
        if stale {
            log::debug!("dropping completion for generation {}", ticket.0);
        }
        stale
    }

    fn on_key(&mut self, input: Input) -> Vec<Effect> {
        match self.screen {
            Screen::BucketSelection => self.bucket_key(input),
            Screen::List => self.list_key(input),
            Screen::View => self.view_key(input),
            Screen::ConfirmDelete => self.confirm_key(input),
        }
    }

    fn bucket_key(&mut self, input: Input) -> Vec<Effect> {
        let last = self.buckets.len().saturating_sub(1);
        match input {
            Input::Up => self.bucket_cursor = self.bucket_cursor.saturating_sub(1),
            Input::Down => self.bucket_cursor = (self.bucket_cursor + 1).min(last),
            Input::PageUp => {
                self.bucket_cursor = self
                    .bucket_cursor
                    .saturating_sub(self.list_rows() as usize)
            }
            Input::PageDown => {
                self.bucket_cursor = (self.bucket_cursor + self.list_rows() as usize).min(last)
            }
            Input::Top => self.bucket_cursor = 0,
            Input::Bottom => self.bucket_cursor = last,
            Input::Open => {
                if let Some(name) = self.buckets.get(self.bucket_cursor).cloned() {
                    return self.choose_bucket(name);
                }
            }
            Input::Refresh => return self.start_bucket_listing(),
            Input::Quit => return vec![Effect::Quit],
            _ => {}
        }
        Vec::new()
    }

    fn list_key(&mut self, input: Input) -> Vec<Effect> {
        let last = self.emails.len().saturating_sub(1);
        match input {
            Input::Up => self.cursor = self.cursor.saturating_sub(1),
            Input::Down => {
                self.cursor = (self.cursor + 1).min(last);
                return self.read_ahead();
            }
            Input::PageUp => self.cursor = self.cursor.saturating_sub(self.list_rows() as usize),
            Input::PageDown => {
                self.cursor = (self.cursor + self.list_rows() as usize).min(last);
                return self.read_ahead();
            }
            Input::Top => self.cursor = 0,
            Input::Bottom => {
                self.cursor = last;
                return self.read_ahead();
            }
            Input::Open => {
                if !self.emails.is_empty() {
                    self.open(self.cursor);
                    self.screen = Screen::View;
                }
            }
            Input::Delete => {
                if !self.emails.is_empty() {
                    self.ask_delete(self.cursor, Screen::List);
                }
            }
            Input::Refresh => return self.start_ingest(),
            Input::Back => {
                self.bucket = None;
                self.screen = Screen::BucketSelection;
                return self.start_bucket_listing();
            }
            Input::Quit => return vec![Effect::Quit],
            _ => {}
        }
        Vec::new()
    }

    fn view_key(&mut self, input: Input) -> Vec<Effect> {
        let page = self.body_rows();
        let max = self.max_body_scroll();
        match input {
            Input::Up => self.body_scroll = self.body_scroll.saturating_sub(1),
            Input::Down => self.body_scroll = self.body_scroll.saturating_add(1).min(max),
            Input::PageUp => self.body_scroll = self.body_scroll.saturating_sub(page),
            Input::PageDown => self.body_scroll = self.body_scroll.saturating_add(page).min(max),
            Input::Top => self.body_scroll = 0,
            Input::Bottom => self.body_scroll = max,
            Input::Back => self.close(),
            Input::Delete => {
                if let Some(i) = self.selected {
                    self.ask_delete(i, Screen::View);
                }
            }
            Input::Quit => return vec![Effect::Quit],
            _ => {}
        }
        Vec::new()
    }

    fn confirm_key(&mut self, input: Input) -> Vec<Effect> {
        if self.deleting {
            return Vec::new();
        }
        match input {
            Input::Confirm => {
                let (Some(pending), Some(bucket)) = (&self.pending_delete, &self.bucket) else {
                    return Vec::new();
                };
                self.deleting = true;
                vec![Effect::Delete {
                    ticket: self.ticket(),
                    bucket: bucket.clone(),
                    key: pending.key.clone(),
                }]
            }
            Input::Cancel => {
                self.pending_delete = None;
                self.screen = self.return_screen;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn ask_delete(&mut self, index: usize, from: Screen) {
        let key = self.emails[index].key.clone();
        self.pending_delete = Some(PendingDelete { index, key });
        self.return_screen = from;
        self.screen = Screen::ConfirmDelete;
    }

    /// Prefetch when the highlight sits on the last loaded row.
    fn read_ahead(&mut self) -> Vec<Effect> {
        let on_last = !self.emails.is_empty() && self.cursor == self.emails.len() - 1;
        if !on_last || !self.has_more || self.loading {
            return Vec::new();
        }
        let Some(bucket) = self.bucket.clone() else {
            return Vec::new();
        };
        self.loading = true;
        log::debug!("read-ahead after {} emails", self.emails.len());
        vec![Effect::FetchPage {
            ticket: self.ticket(),
            request: PageRequest {
                bucket,
                prefix: self.prefix.clone(),
                cursor: self.continuation.clone(),
            },
        }]
    }

    /// Drops every message and invalidates requests in flight.
    fn reset(&mut self) {
        self.generation += 1;
        self.emails.clear();
        self.cursor = 0;
        self.selected = None;
        self.pending_delete = None;
        self.continuation = None;
        self.has_more = true;
        self.loading = false;
        self.deleting = false;
        self.body.clear();
        self.body_lines.clear();
        self.body_scroll = 0;
    }

    fn start_ingest(&mut self) -> Vec<Effect> {
        self.reset();
        let Some(bucket) = self.bucket.clone() else {
            return Vec::new();
        };
        self.loading = true;
        vec![Effect::FetchPage {
            ticket: self.ticket(),
            request: PageRequest {
                bucket,
                prefix: self.prefix.clone(),
                cursor: None,
            },
        }]
    }

    fn start_bucket_listing(&mut self) -> Vec<Effect> {
        self.reset();
        self.buckets.clear();
        self.bucket_cursor = 0;
        self.loading = true;
        vec![Effect::ListBuckets {
            ticket: self.ticket(),
        }]
    }

    fn choose_bucket(&mut self, name: String) -> Vec<Effect> {
        log::info!("using bucket {name}");
        self.bucket = Some(name);
        self.screen = Screen::List;
        self.start_ingest()
    }

    fn on_buckets(&mut self, names: Vec<String>) -> Vec<Effect> {
        if let Some(only) = buckets::auto_select(&names) {
            let only = only.to_string();
            return self.choose_bucket(only);
        }
        self.buckets = buckets::order_buckets(names);
        self.bucket_cursor = 0;
        Vec::new()
    }

    fn on_page(&mut self, page: Page) {
        let cursor_key = self.emails.get(self.cursor).map(|e| e.key.clone());
        let selected_key = self.selected_email().map(|e| e.key.clone());

        merge_page(&mut self.emails, page.emails);
        self.continuation = page.next_cursor;
        self.has_more = page.has_more;

        // keep the highlight and the open message on the same emails
        if let Some(i) = cursor_key.and_then(|k| self.position(&k)) {
            self.cursor = i;
        }
        if let Some(i) = selected_key.and_then(|k| self.position(&k)) {
            self.selected = Some(i);
        }
        if let Some(p) = self.pending_delete.as_mut() {
            if let Some(i) = self.emails.iter().position(|e| e.key == p.key) {
                p.index = i;
            }
        }
    }

    fn on_deleted(&mut self, key: &str) -> Vec<Effect> {
        let pending = self.pending_delete.take();
        let index = pending
            .filter(|p| self.emails.get(p.index).is_some_and(|e| e.key == key))
            .map(|p| p.index)
            .or_else(|| self.position(key));

        if let Some(i) = index {
            self.emails.remove(i);
            self.cursor = i.min(self.emails.len().saturating_sub(1));
        }

        if self.return_screen == Screen::View && !self.emails.is_empty() {
            self.open(self.cursor);
            self.screen = Screen::View;
        } else {
            self.close();
        }

        self.status = Some(DELETED_STATUS.to_string());
        self.status_serial += 1;
        vec![Effect::ClearStatusAfter {
            delay: STATUS_DELAY,
            serial: self.status_serial,
        }]
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.emails.iter().position(|e| e.key == key)
    }

    fn open(&mut self, index: usize) {
        let Some(email) = self.emails.get(index) else {
            return;
        };
        self.body = match self.renderer.render(&email.body) {
            Ok(rendered) => rendered,
            Err(e) => {
                log::debug!("rendering {} as plain text: {e:#}", email.key);
                email.body.clone()
            }
        };
        self.selected = Some(index);
        self.body_scroll = 0;
        self.rewrap();
    }

    fn close(&mut self) {
        self.selected = None;
        self.body.clear();
        self.body_lines.clear();
        self.body_scroll = 0;
        self.screen = Screen::List;
    }

    /// Re-wraps the body inside the viewport border and clamps the scroll.
    fn rewrap(&mut self) {
        self.body_lines = if self.body.is_empty() {
            Vec::new()
        } else {
            wrap(&self.body, usize::from(self.width.saturating_sub(2)))
        };
        self.body_scroll = self.body_scroll.min(self.max_body_scroll());
    }

    fn max_body_scroll(&self) -> u16 {
        let lines = self.body_lines.len().min(usize::from(u16::MAX)) as u16;
        lines.saturating_sub(self.body_rows())
    }
}

/// Consuming form of [`Session::update`].
pub fn step(mut session: Session, event: Event) -> (Session, Vec<Effect>) {
    let effects = session.update(event);
    (session, effects)
}
