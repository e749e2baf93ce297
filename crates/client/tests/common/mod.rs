#![allow(dead_code)]

use std::sync::Arc;

use client::{ExpenseClient, KeyValueStore, MemoryStore};
use mock_server::ServerState;

pub struct Backend {
    pub state: ServerState,
    pub base_url: String,
}

pub async fn spawn_backend() -> Backend {
    let state = ServerState::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = mock_server::spawn_with_listener(state.clone(), listener).unwrap();
    Backend {
        state,
        base_url: format!("http://{addr}"),
    }
}

impl Backend {
    pub fn client(&self) -> ExpenseClient {
        self.client_with_store(Arc::new(MemoryStore::new()))
    }

    pub fn client_with_store(&self, store: Arc<dyn KeyValueStore>) -> ExpenseClient {
        ExpenseClient::builder()
            .base_url(&self.base_url)
            .store(store)
            .build()
            .unwrap()
    }

    /// Client already signed up and logged in as `username`.
    pub async fn user(&self, username: &str) -> ExpenseClient {
        let client = self.client();
        client.signup(username, "secret").await.unwrap();
        client
    }
}

/// Base URL of a port nothing listens on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
