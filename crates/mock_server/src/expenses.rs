//! Expense resource endpoints.

use api_types::expense::{Expense, ExpenseNew, ExpenseUpdate};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

use crate::{ServerError, matches_filter, server::ServerState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    user_id: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ExpenseFilter>,
) -> Json<Vec<Expense>> {
    let db = state.db.lock().await;
    let expenses = db
        .expenses
        .iter()
        .filter(|expense| matches_filter(&expense.user_id, filter.user_id.as_deref()))
        .cloned()
        .collect();
    Json(expenses)
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, ServerError> {
    let db = state.db.lock().await;
    db.expenses
        .iter()
        .find(|expense| expense.id == id)
        .cloned()
        .map(Json)
        .ok_or(ServerError::NotFound)
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<Expense>), ServerError> {
    if payload.name.trim().is_empty() {
        return Err(ServerError::Generic("name must not be empty".to_string()));
    }

    let mut db = state.db.lock().await;
    let expense = Expense {
        id: db.next_expense_id(),
        name: payload.name,
        amount: payload.amount,
        description: payload.description,
        category: Some(payload.category),
        title: payload.title,
        date: Some(payload.date),
        payment_method: payload.payment_method,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        user_id: payload.user_id,
    };
    db.expenses.push(expense.clone());
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Merges the present fields into the stored record.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, ServerError> {
    let mut db = state.db.lock().await;
    let expense = db
        .expenses
        .iter_mut()
        .find(|expense| expense.id == id)
        .ok_or(ServerError::NotFound)?;

    if let Some(name) = payload.name {
        expense.name = name;
    }
    if let Some(amount) = payload.amount {
        expense.amount = amount;
    }
    if let Some(description) = payload.description {
        expense.description = description;
    }
    if let Some(category) = payload.category {
        expense.category = Some(category);
    }
    if let Some(title) = payload.title {
        expense.title = Some(title);
    }
    if let Some(date) = payload.date {
        expense.date = Some(date);
    }
    if let Some(payment_method) = payload.payment_method {
        expense.payment_method = Some(payment_method);
    }
    if let Some(user_id) = payload.user_id {
        expense.user_id = user_id;
    }

    Ok(Json(expense.clone()))
}

/// Removes the record and echoes it back.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, ServerError> {
    let mut db = state.db.lock().await;
    let index = db
        .expenses
        .iter()
        .position(|expense| expense.id == id)
        .ok_or(ServerError::NotFound)?;
    Ok(Json(db.expenses.remove(index)))
}
