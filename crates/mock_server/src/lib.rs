//! In-process stand-in for the hosted expense backend.
//!
//! Serves the same routes with the same quirks (string ids, substring query
//! filters, no ownership enforcement) so the client can be exercised without
//! network access.
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod expenses;
mod server;
mod users;

pub enum ServerError {
    NotFound,
    Unauthorized,
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

/// Substring match used by the backend for `?field=value` filters.
fn matches_filter(value: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) if !filter.is_empty() => value.contains(filter),
        _ => true,
    }
}
