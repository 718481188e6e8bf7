#![forbid(unsafe_code)]

//! Deferred change notification.
//!
//! Inside a [`BatchScope`], [`StateCell`](super::StateCell) writes apply
//! immediately but subscriber notifications are queued. When the outermost
//! scope drops, the queue is flushed in order. Each cell queues at most one
//! notification per batch and delivers its value as of the flush.
//!
//! # Invariants
//!
//! 1. Nested scopes are allowed; only the outermost one flushes.
//! 2. Reads inside a batch always see the latest written value.
//! 3. Notifications queued during a flush run in the same flush.

use std::cell::RefCell;
use std::marker::PhantomData;

type Deferred = Box<dyn FnOnce()>;

#[derive(Default)]
struct BatchContext {
    depth: u32,
    pending: Vec<Deferred>,
}

thread_local! {
    static BATCH: RefCell<BatchContext> = RefCell::new(BatchContext::default());
}

/// RAII guard that defers notifications until dropped.
#[must_use = "notifications flush as soon as the scope is dropped"]
pub struct BatchScope {
    // Scopes are tied to the thread-local context.
    _not_send: PhantomData<*const ()>,
}

impl BatchScope {
    /// Open a batch on the current thread.
    pub fn new() -> Self {
        BATCH.with(|ctx| ctx.borrow_mut().depth += 1);
        Self {
            _not_send: PhantomData,
        }
    }

    /// Whether any batch is open on the current thread.
    #[must_use]
    pub fn is_active() -> bool {
        BATCH.with(|ctx| ctx.borrow().depth > 0)
    }

    /// Number of notifications waiting for the outermost scope.
    #[must_use]
    pub fn pending_count() -> usize {
        BATCH.with(|ctx| ctx.borrow().pending.len())
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let outermost = BATCH.with(|ctx| {
            let mut ctx = ctx.borrow_mut();
            ctx.depth = ctx.depth.saturating_sub(1);
            ctx.depth == 0
        });
        if outermost {
            flush();
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("pending", &Self::pending_count())
            .finish()
    }
}

/// Run `f` with notifications batched, flushing once at the end.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    let _scope = BatchScope::new();
    f()
}

/// Queue `f` if a batch is open, otherwise run it now.
pub(crate) fn defer_or_run(f: impl FnOnce() + 'static) {
    let queued = BATCH.with(|ctx| {
        let mut ctx = ctx.borrow_mut();
        if ctx.depth > 0 {
            ctx.pending.push(Box::new(f));
            None
        } else {
            Some(f)
        }
    });
    if let Some(f) = queued {
        f();
    }
}

fn flush() {
    loop {
        let pending = BATCH.with(|ctx| std::mem::take(&mut ctx.borrow_mut().pending));
        if pending.is_empty() {
            break;
        }
        tracing::trace!(count = pending.len(), "flushing batched notifications");
        for notify in pending {
            notify();
        }
    }
}
