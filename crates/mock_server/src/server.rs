use std::{net::SocketAddr, sync::Arc};

use api_types::{expense::Expense, user::User};
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tokio::sync::Mutex;

use crate::{ServerError, expenses, users};

#[derive(Debug, Default)]
pub(crate) struct Db {
    pub users: Vec<User>,
    pub expenses: Vec<Expense>,
    next_user_id: u64,
    next_expense_id: u64,
}

impl Db {
    pub(crate) fn next_user_id(&mut self) -> String {
        self.next_user_id += 1;
        self.next_user_id.to_string()
    }

    pub(crate) fn next_expense_id(&mut self) -> String {
        self.next_expense_id += 1;
        self.next_expense_id.to_string()
    }
}

/// Shared backend state. Clones see the same data.
#[derive(Clone, Debug, Default)]
pub struct ServerState {
    pub(crate) db: Arc<Mutex<Db>>,
}

impl ServerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn users(&self) -> Vec<User> {
        self.db.lock().await.users.clone()
    }

    pub async fn expenses(&self) -> Vec<Expense> {
        self.db.lock().await.expenses.clone()
    }

    pub async fn expense(&self, id: &str) -> Option<Expense> {
        self.db
            .lock()
            .await
            .expenses
            .iter()
            .find(|expense| expense.id == id)
            .cloned()
    }

    /// Drops a user record, e.g. to make an existing bearer token stale.
    pub async fn remove_user(&self, id: &str) {
        self.db.lock().await.users.retain(|user| user.id != id);
    }
}

/// Rejects a bearer naming a user that does not exist. Requests without the
/// header go through; the backend does no other authorization.
async fn auth(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        let known = state
            .db
            .lock()
            .await
            .users
            .iter()
            .any(|user| user.id == bearer.token());
        if !known {
            tracing::debug!("rejecting unknown bearer");
            return ServerError::Unauthorized.into_response();
        }
    }
    next.run(request).await
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Mock backend listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
