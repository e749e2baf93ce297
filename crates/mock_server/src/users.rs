use api_types::user::{User, UserNew};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

use crate::{ServerError, matches_filter, server::ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    username: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<UserFilter>,
) -> Json<Vec<User>> {
    let db = state.db.lock().await;
    let users = db
        .users
        .iter()
        .filter(|user| matches_filter(&user.username, filter.username.as_deref()))
        .cloned()
        .collect();
    Json(users)
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    if payload.username.trim().is_empty() {
        return Err(ServerError::Generic("username must not be empty".to_string()));
    }

    let mut db = state.db.lock().await;
    let created_at = if payload.created_at.is_empty() {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    } else {
        payload.created_at
    };
    let user = User {
        id: db.next_user_id(),
        username: payload.username,
        password: payload.password,
        created_at,
    };
    db.users.push(user.clone());
    Ok((StatusCode::CREATED, Json(user)))
}
