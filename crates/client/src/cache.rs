//! Pull-based result cache.
//!
//! Each key walks `Empty → Loading → Fresh → Stale → Loading → Fresh …`.
//! Invalidation only marks an entry stale; the next read refetches. Nothing is
//! pushed to readers and there is no TTL. Readers arriving while a key is
//! Loading wait for that load instead of starting their own.
use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::sync::{Mutex, watch};

use crate::executor::ApiResponse;

/// Cache identity of a result: the logged-in user, the expense list or one
/// expense by id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    User,
    Expenses,
    Expense(String),
}

impl QueryKey {
    pub fn expense(id: &str) -> Self {
        Self::Expense(id.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryState {
    Empty,
    Loading,
    Fresh,
    Stale,
}

type Pending<V> = watch::Receiver<Option<ApiResponse<V>>>;

#[derive(Debug)]
struct Entry<V> {
    state: QueryState,
    response: Option<ApiResponse<V>>,
    /// Bumped on every invalidation so a load that started before it lands
    /// as stale.
    generation: u64,
    /// Result channel of the load in flight.
    pending: Option<Pending<V>>,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            state: QueryState::Empty,
            response: None,
            generation: 0,
            pending: None,
        }
    }
}

#[derive(Debug)]
struct Entries<V> {
    map: HashMap<QueryKey, Entry<V>>,
    /// Bumped by `clear`; a load started under an older epoch is not stored.
    epoch: u64,
}

#[derive(Debug)]
pub struct QueryCache<V> {
    entries: Arc<Mutex<Entries<V>>>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries {
                map: HashMap::new(),
                epoch: 0,
            })),
        }
    }
}

enum Lookup<V> {
    Hit(ApiResponse<V>),
    Wait(Pending<V>),
    Load {
        generation: u64,
        epoch: u64,
        done: watch::Sender<Option<ApiResponse<V>>>,
    },
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self, key: &QueryKey) -> QueryState {
        self.entries
            .lock()
            .await
            .map
            .get(key)
            .map(|entry| entry.state)
            .unwrap_or(QueryState::Empty)
    }

    /// Last stored response, fresh or stale, without fetching.
    pub async fn peek(&self, key: &QueryKey) -> Option<ApiResponse<V>> {
        self.entries
            .lock()
            .await
            .map
            .get(key)
            .and_then(|entry| entry.response.clone())
    }

    /// Returns the fresh response for `key`, loading it when missing or stale.
    ///
    /// The lock is released while `loader` runs. Callers that find the key
    /// Loading share that load's response; `loader` then never runs. If the
    /// load they wait on is dropped, the next waiter takes over.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, loader: F) -> ApiResponse<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResponse<V>>,
    {
        let (generation, epoch, done) = loop {
            match self.lookup(&key).await {
                Lookup::Hit(response) => return response,
                Lookup::Wait(mut pending) => {
                    tracing::trace!(?key, "waiting on load in flight");
                    let shared = pending
                        .wait_for(Option::is_some)
                        .await
                        .ok()
                        .and_then(|response| (*response).clone());
                    if let Some(response) = shared {
                        return response;
                    }
                }
                Lookup::Load {
                    generation,
                    epoch,
                    done,
                } => break (generation, epoch, done),
            }
        };

        tracing::trace!(?key, "cache miss, loading");
        let response = loader().await;

        {
            let mut guard = self.entries.lock().await;
            if guard.epoch == epoch {
                let entry = guard.map.entry(key).or_default();
                entry.state = if response.success && entry.generation == generation {
                    QueryState::Fresh
                } else {
                    QueryState::Stale
                };
                entry.response = Some(response.clone());
                entry.pending = None;
            } else {
                tracing::trace!(?key, "cache cleared during load, result not stored");
            }
        }
        done.send_replace(Some(response.clone()));
        response
    }

    async fn lookup(&self, key: &QueryKey) -> Lookup<V> {
        let mut guard = self.entries.lock().await;
        let epoch = guard.epoch;
        let entry = guard.map.entry(key.clone()).or_default();

        if entry.state == QueryState::Fresh
            && let Some(response) = &entry.response
        {
            tracing::trace!(?key, "cache hit");
            return Lookup::Hit(response.clone());
        }

        // A closed channel means the loading caller went away.
        if let Some(pending) = &entry.pending
            && pending.has_changed().is_ok()
        {
            return Lookup::Wait(pending.clone());
        }

        let (done, pending) = watch::channel(None);
        entry.state = QueryState::Loading;
        entry.pending = Some(pending);
        Lookup::Load {
            generation: entry.generation,
            epoch,
            done,
        }
    }

    /// Stores `value` as a fresh result.
    pub async fn set(&self, key: QueryKey, value: V) {
        let mut guard = self.entries.lock().await;
        let entry = guard.map.entry(key).or_default();
        entry.state = QueryState::Fresh;
        entry.response = Some(ApiResponse::ok(value));
    }

    /// Marks `key` stale. Empty keys stay empty.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut guard = self.entries.lock().await;
        if let Some(entry) = guard.map.get_mut(key) {
            entry.generation += 1;
            if entry.state != QueryState::Empty {
                entry.state = QueryState::Stale;
            }
            tracing::trace!(?key, "invalidated");
        }
    }

    /// Drops every entry. Loads still in flight are not stored when they
    /// finish.
    pub async fn clear(&self) {
        let mut guard = self.entries.lock().await;
        guard.map.clear();
        guard.epoch += 1;
    }
}
