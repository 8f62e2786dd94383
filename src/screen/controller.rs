use std::future::Future;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;

/// What a screen is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T, E = ApiError> {
    Idle,
    /// `stale` is the previous data, shown while a refresh runs
    Loading { stale: Option<T> },
    Ready(T),
    Failed(E),
}

impl<T, E> ScreenState<T, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading { .. })
    }

    /// Loading on top of data that is still displayed.
    pub fn is_refreshing(&self) -> bool {
        matches!(self, ScreenState::Loading { stale: Some(_) })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ScreenState::Ready(data)
            | ScreenState::Loading {
                stale: Some(data),
            } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            ScreenState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnError {
    Replace,
    KeepStale,
}

type Observer<T, E> = Arc<dyn Fn(&ScreenState<T, E>) + Send + Sync>;

struct Slot<T, E> {
    state: ScreenState<T, E>,
    /// Ticket of the most recent load; older tickets are superseded
    latest: u64,
}

struct Inner<T, E> {
    slot: Mutex<Slot<T, E>>,
    observers: Mutex<Vec<Observer<T, E>>>,
}

/// Drives one screen through `Idle -> Loading -> Ready | Failed`.
///
/// Every load takes a ticket. Only the response holding the latest ticket may
/// change the state; anything older is discarded. If a load is dropped before
/// it finishes the loading state is unwound, so the flag never sticks.
///
/// Clones share state and observers.
pub struct ScreenController<T, E = ApiError> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for ScreenController<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone, E: Clone> Default for ScreenController<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, E: Clone> ScreenController<T, E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot {
                    state: ScreenState::Idle,
                    latest: 0,
                }),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> ScreenState<T, E> {
        self.slot().state.clone()
    }

    pub fn data(&self) -> Option<T> {
        self.slot().state.data().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.slot().state.is_loading()
    }

    /// Registers a callback invoked after every state transition.
    pub fn subscribe(&self, observer: impl Fn(&ScreenState<T, E>) + Send + Sync + 'static) {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Runs `fetch` as the latest load.
    ///
    /// Returns `None` when a newer load (or a reset) superseded this one
    /// before it finished; the state is then left to the newer load.
    pub async fn load<F>(&self, fetch: F) -> Option<Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.run(fetch, OnError::Replace).await
    }

    /// Like [`load`](Self::load), but a failure keeps the previous data on
    /// screen instead of replacing it with the error.
    pub async fn refresh<F>(&self, fetch: F) -> Option<Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.run(fetch, OnError::KeepStale).await
    }

    /// Edits loaded data in place. Returns false when nothing is loaded.
    pub fn update(&self, edit: impl FnOnce(&mut T)) -> bool {
        let snapshot = {
            let mut slot = self.slot();
            match &mut slot.state {
                ScreenState::Ready(data) => {
                    edit(data);
                    slot.state.clone()
                }
                _ => return false,
            }
        };
        self.notify(&snapshot);
        true
    }

    /// Shows `error` without a request, superseding any load in flight.
    pub fn fail(&self, error: E) {
        self.replace(ScreenState::Failed(error));
    }

    /// Back to `Idle`, superseding any load in flight.
    pub fn reset(&self) {
        self.replace(ScreenState::Idle);
    }

    async fn run<F>(&self, fetch: F, on_error: OnError) -> Option<Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let ticket = self.begin();
        let guard = LoadGuard {
            controller: self,
            ticket,
            armed: true,
        };
        let outcome = fetch.await;
        guard.disarm();
        self.finish(ticket, outcome, on_error)
    }

    fn begin(&self) -> u64 {
        let (ticket, snapshot) = {
            let mut slot = self.slot();
            slot.latest += 1;
            let snapshot = if slot.state.is_loading() {
                None
            } else {
                let stale = take_data(&mut slot.state);
                slot.state = ScreenState::Loading { stale };
                Some(slot.state.clone())
            };
            (slot.latest, snapshot)
        };
        if let Some(snapshot) = snapshot {
            self.notify(&snapshot);
        }
        ticket
    }

    fn finish(&self, ticket: u64, outcome: Result<T, E>, on_error: OnError) -> Option<Result<T, E>> {
        let snapshot = {
            let mut slot = self.slot();
            if slot.latest != ticket {
                tracing::debug!(ticket, latest = slot.latest, "Discarding superseded screen response");
                return None;
            }
            let stale = take_data(&mut slot.state);
            slot.state = match (&outcome, stale, on_error) {
                (Ok(data), _, _) => ScreenState::Ready(data.clone()),
                (Err(_), Some(stale), OnError::KeepStale) => ScreenState::Ready(stale),
                (Err(error), _, _) => ScreenState::Failed(error.clone()),
            };
            slot.state.clone()
        };
        self.notify(&snapshot);
        Some(outcome)
    }

    /// Unwinds a load that was dropped mid-flight.
    fn abandon(&self, ticket: u64) {
        let snapshot = {
            let mut slot = self.slot();
            if slot.latest != ticket || !slot.state.is_loading() {
                return;
            }
            slot.state = match take_data(&mut slot.state) {
                Some(stale) => ScreenState::Ready(stale),
                None => ScreenState::Idle,
            };
            slot.state.clone()
        };
        tracing::debug!(ticket, "Screen load dropped before completion");
        self.notify(&snapshot);
    }

    fn replace(&self, state: ScreenState<T, E>) {
        let snapshot = {
            let mut slot = self.slot();
            slot.latest += 1;
            slot.state = state;
            slot.state.clone()
        };
        self.notify(&snapshot);
    }

    fn notify(&self, state: &ScreenState<T, E>) {
        // called with no lock held so observers may read the controller
        let observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer(state);
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot<T, E>> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn take_data<T, E>(state: &mut ScreenState<T, E>) -> Option<T> {
    match mem::replace(state, ScreenState::Idle) {
        ScreenState::Ready(data) => Some(data),
        ScreenState::Loading { stale } => stale,
        _ => None,
    }
}

struct LoadGuard<'a, T: Clone, E: Clone> {
    controller: &'a ScreenController<T, E>,
    ticket: u64,
    armed: bool,
}

impl<T: Clone, E: Clone> LoadGuard<'_, T, E> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<T: Clone, E: Clone> Drop for LoadGuard<'_, T, E> {
    fn drop(&mut self) {
        if self.armed {
            self.controller.abandon(self.ticket);
        }
    }
}
