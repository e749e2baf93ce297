//! Client for the expense tracker backend.
//!
//! [`ExpenseClient`] is the context every operation goes through: it owns the
//! HTTP wrapper, the session and the result caches. Clones share all of them.
//!
//! ```no_run
//! # async fn demo() -> client::Result<()> {
//! use client::{ExpenseClient, ExpenseFields};
//!
//! let client = ExpenseClient::builder()
//!     .base_url("http://127.0.0.1:3000")
//!     .build()?;
//! client.restore_session().await;
//! client.login("alice", "secret").await?;
//! client
//!     .create_expense(ExpenseFields::new("Lunch", "12.50"))
//!     .await?;
//! let mine = client.list_expenses().await?;
//! # let _ = mine;
//! # Ok(())
//! # }
//! ```
use std::sync::Arc;

use api_types::expense::Expense;

pub use cache::{QueryCache, QueryKey, QueryState};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, Result, Route};
pub use executor::{ApiResponse, handle_api_request};
pub use expenses::{DEFAULT_CATEGORY, ExpenseFields};
pub use http::{HttpClient, RequestError};
pub use money::{Amount, AmountError};
pub use notice::{Notice, NoticeLevel, Operation};
pub use session::{Session, SessionStore};
pub use store::{FileStore, KeyValueStore, MemoryStore, SESSION_KEY, StoreError};
pub use summary::{CategoryTotal, MonthTotal, Summary};

pub mod types {
    pub use api_types::{
        expense::{Expense, ExpenseNew, ExpenseUpdate},
        user::{User, UserNew},
    };
}

mod auth;
mod cache;
mod config;
mod error;
mod executor;
mod expenses;
pub mod format;
mod http;
mod money;
mod notice;
mod session;
mod store;
mod summary;

#[derive(Clone, Debug)]
pub struct ExpenseClient {
    http: HttpClient,
    session: SessionStore,
    user: QueryCache<Session>,
    expense_lists: QueryCache<Vec<Expense>>,
    expenses: QueryCache<Expense>,
}

impl ExpenseClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let http = HttpClient::new(config, store.clone())?;
        Ok(Self {
            http,
            session: SessionStore::new(store),
            user: QueryCache::new(),
            expense_lists: QueryCache::new(),
            expenses: QueryCache::new(),
        })
    }

    /// Return a builder for `ExpenseClient`.
    pub fn builder() -> ExpenseClientBuilder {
        ExpenseClientBuilder::default()
    }

    /// Reads the persisted session into memory. Call once at start-up.
    pub async fn restore_session(&self) -> Option<Session> {
        let session = self.session.restore().await?;
        self.user.set(QueryKey::User, session.clone()).await;
        Some(session)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Cache state of `key`, for observers deciding whether to redraw.
    pub async fn cache_state(&self, key: &QueryKey) -> QueryState {
        match key {
            QueryKey::User => self.user.state(key).await,
            QueryKey::Expenses => self.expense_lists.state(key).await,
            QueryKey::Expense(_) => self.expenses.state(key).await,
        }
    }

    /// Drops every cached result, including the seeded user.
    async fn clear_caches(&self) {
        self.user.clear().await;
        self.expense_lists.clear().await;
        self.expenses.clear().await;
    }

    async fn require_session(&self) -> Result<Session> {
        self.session
            .authenticated_user()
            .await
            .ok_or(ClientError::Unauthenticated)
    }
}

#[derive(Default, Debug)]
pub struct ExpenseClientBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl ExpenseClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the client. Without an explicit store, a [`FileStore`] is opened
    /// at the configured `store_path`.
    pub fn build(self) -> Result<ExpenseClient> {
        let mut config = self.config.unwrap_or_default();
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        let store = match self.store {
            Some(store) => store,
            None => Arc::new(FileStore::open(&config.store_path)?),
        };

        tracing::debug!(base_url = %config.base_url, "building expense client");
        ExpenseClient::new(&config, store)
    }
}
