//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::future::Future;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::error;

use crate::commands::{ApiError, ApiResult};
use crate::config::config;
use crate::query::{CacheTag, InvalidationLedger, Mutation};
use crate::toast::{Toast, ToastKind, ToastQueue};

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Version per cache tag; fetch effects read it, writes bump it
    ledger: RwSignal<InvalidationLedger>,
    toasts: RwSignal<ToastQueue>,
    /// Chat room currently open in the panel
    pub focused_room: RwSignal<Option<u32>>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            ledger: RwSignal::new(InvalidationLedger::new()),
            toasts: RwSignal::new(ToastQueue::new()),
            focused_room: RwSignal::new(None),
        }
    }

    /// Memo that only changes when `tag` is invalidated
    pub fn version(&self, tag: CacheTag) -> Memo<u64> {
        let ledger = self.ledger;
        Memo::new(move |_| ledger.with(|l| l.version(tag)))
    }

    pub fn invalidate(&self, tags: &[CacheTag]) {
        self.ledger.update(|l| l.invalidate(tags));
    }

    /// Record a successful write
    pub fn apply(&self, mutation: Mutation) {
        self.ledger.update(|l| {
            l.apply(mutation);
        });
    }

    /// Run a write; on success invalidate what it touches, on failure report it
    pub fn mutate<T, F>(&self, action: &'static str, mutation: Mutation, request: F)
    where
        T: 'static,
        F: Future<Output = ApiResult<T>> + 'static,
    {
        let ctx = *self;
        spawn_local(async move {
            match request.await {
                Ok(_) => ctx.apply(mutation),
                Err(e) => ctx.report(action, &e),
            }
        });
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.with(|q| q.items().to_vec())
    }

    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let toasts = self.toasts;
        let Some(id) = toasts.try_update(|q| q.push(kind, message)) else { return };
        let ttl = config().toast_ttl.as_millis() as u32;
        Timeout::new(ttl, move || {
            toasts.try_update(|q| q.dismiss(id));
        })
        .forget();
    }

    pub fn dismiss_toast(&self, id: u64) {
        self.toasts.update(|q| {
            q.dismiss(id);
        });
    }

    pub fn toast_info(&self, message: impl Into<String>) {
        self.toast(ToastKind::Info, message);
    }

    pub fn toast_success(&self, message: impl Into<String>) {
        self.toast(ToastKind::Success, message);
    }

    pub fn toast_warning(&self, message: impl Into<String>) {
        self.toast(ToastKind::Warning, message);
    }

    pub fn toast_error(&self, message: impl Into<String>) {
        self.toast(ToastKind::Error, message);
    }

    /// Log a failed request and tell the user
    pub fn report(&self, action: &str, err: &ApiError) {
        error!(action, error = %err, "request failed");
        self.toast_error(err.user_message());
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
