//! List state with stale-response protection.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use crate::errors::Result;

/// What a list view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// Message to display next to a retry action.
    Failed(String),
}

/// Handle for one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

struct Inner<T> {
    generation: u64,
    state: ViewState<T>,
}

/// State of one list view instance.
///
/// Every fetch takes a ticket from a monotonically increasing generation.
/// Only the result for the latest ticket is applied, so a slow response to
/// an older request cannot overwrite a newer one.
pub struct ListView<T> {
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> ListView<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                state: ViewState::Idle,
            }),
        }
    }

    /// Start a fetch: issue the next ticket and show the loading state.
    pub fn begin(&self) -> Ticket {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = ViewState::Loading;
        Ticket(inner.generation)
    }

    /// Apply a fetch result if `ticket` is still the latest.
    ///
    /// Returns whether the result was applied.
    pub fn complete(&self, ticket: Ticket, result: Result<T>) -> bool {
        let mut inner = self.lock();
        if ticket.0 != inner.generation {
            tracing::debug!(
                ticket = ticket.0,
                latest = inner.generation,
                "Discarding stale response"
            );
            return false;
        }

        inner.state = match result {
            Ok(value) => ViewState::Loaded(value),
            Err(e) => ViewState::Failed(e.message().to_string()),
        };
        true
    }

    /// Run `fetch` under a fresh ticket. Retrying is calling this again.
    pub async fn load<F>(&self, fetch: F) -> bool
    where
        F: Future<Output = Result<T>>,
    {
        let ticket = self.begin();
        let result = fetch.await;
        self.complete(ticket, result)
    }

    pub fn state(&self) -> ViewState<T> {
        self.lock().state.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.lock().state, ViewState::Loading)
    }

    /// Loaded value, if any.
    pub fn data(&self) -> Option<T> {
        match &self.lock().state {
            ViewState::Loaded(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}
