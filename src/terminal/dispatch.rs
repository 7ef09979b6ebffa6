//! Runs session effects on the tokio runtime and reports each completion
//! back to the UI thread as one [`Event`].

use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use anyhow::Context;
use tokio::runtime::Handle;

use crate::ingest::fetch_page;
use crate::session::{Effect, Event};
use crate::store::ObjectStore;

pub struct Dispatcher {
    handle: Handle,
    store: Arc<dyn ObjectStore>,
    tx: Sender<Event>,
}

impl Dispatcher {
    pub fn new(handle: Handle, store: Arc<dyn ObjectStore>, tx: Sender<Event>) -> Self {
        Self { handle, store, tx }
    }

    /// Fire and forget. `Effect::Quit` belongs to the caller and is ignored.
    pub fn dispatch(&self, effect: Effect) {
        log::debug!("dispatching {effect:?}");
        let store = Arc::clone(&self.store);
        match effect {
            Effect::ListBuckets { ticket } => self.spawn(async move {
                let result = store.list_buckets().await.context("listing buckets");
                Event::BucketsLoaded { ticket, result }
            }),
            Effect::FetchPage { ticket, request } => self.spawn(async move {
                let result = fetch_page(store.as_ref(), &request)
                    .await
                    .with_context(|| format!("loading s3://{}/{}", request.bucket, request.prefix));
                Event::PageLoaded { ticket, result }
            }),
            Effect::Delete {
                ticket,
                bucket,
                key,
            } => self.spawn(async move {
                let result = store
                    .delete_object(&bucket, &key)
                    .await
                    .with_context(|| format!("deleting {key}"));
                Event::Deleted {
                    ticket,
                    key,
                    result,
                }
            }),
            Effect::ClearStatusAfter { delay, serial } => self.spawn(async move {
                tokio::time::sleep(delay).await;
                Event::StatusExpired { serial }
            }),
            Effect::Quit => {}
        }
    }

    fn spawn<F>(&self, work: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let event = work.await;
            if tx.send(event).is_err() {
                log::debug!("ui gone, completion dropped");
            }
        });
    }
}
