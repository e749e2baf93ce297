//! Expense access: every operation is scoped to the logged-in owner.
//!
//! Mutations re-read the target before writing (ownership, duplicate names).
//! The backend has no conditional writes, so a concurrent change between the
//! check and the write is not detected.
use api_types::expense::{Expense, ExpenseNew, ExpenseUpdate};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::{
    ExpenseClient,
    cache::QueryKey,
    error::{ClientError, Result},
    executor::{ApiResponse, handle_api_request},
    session::Session,
};

const EXPENSES_PATH: &str = "/expenses";

/// Category used when the caller does not pick one.
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnerQuery<'a> {
    user_id: &'a str,
}

/// Caller-supplied fields of a new expense.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseFields {
    pub name: String,
    /// Decimal text, e.g. `"12.50"`.
    pub amount: String,
    pub description: String,
    pub category: Option<String>,
    /// RFC3339; defaults to the time of the create call.
    pub date: Option<String>,
    pub title: Option<String>,
    pub payment_method: Option<String>,
}

impl ExpenseFields {
    pub fn new(name: &str, amount: &str) -> Self {
        Self {
            name: name.to_string(),
            amount: amount.to_string(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    fn into_new(self, owner: &str, now: String) -> ExpenseNew {
        ExpenseNew {
            name: self.name.trim().to_string(),
            amount: self.amount.trim().to_string(),
            description: self.description,
            category: self
                .category
                .filter(|category| !category.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            title: self.title,
            date: self.date.unwrap_or(now),
            payment_method: self.payment_method,
            user_id: owner.to_string(),
        }
    }
}

impl ExpenseClient {
    /// Expenses owned by the logged-in user, served from cache when fresh.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let session = self.require_session().await?;
        let expenses = self
            .expense_lists
            .fetch(QueryKey::Expenses, || self.fetch_owned(&session.id))
            .await
            .into_result()
            .map_err(ClientError::Transport)?;
        Ok(owned_by(expenses, &session.id))
    }

    /// One expense by id. Ownership is checked after the round-trip.
    pub async fn get_expense(&self, id: &str) -> Result<Expense> {
        let session = self.require_session().await?;
        let expense = self
            .expenses
            .fetch(QueryKey::expense(id), || self.fetch_expense(id))
            .await
            .into_result()
            .map_err(ClientError::Transport)?;
        ensure_owner(&expense, &session)?;
        Ok(expense)
    }

    pub async fn create_expense(&self, fields: ExpenseFields) -> Result<Expense> {
        let session = self.require_session().await?;
        self.ensure_unique_name(&session, &fields.name, None)
            .await?;

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let payload = fields.into_new(&session.id, now);
        let created: Expense = handle_api_request(|| self.http.post(EXPENSES_PATH, &payload))
            .await
            .into_result()
            .map_err(ClientError::Transport)?;

        self.expense_lists.invalidate(&QueryKey::Expenses).await;
        tracing::info!(expense_id = %created.id, "expense created");
        Ok(created)
    }

    /// Applies a partial update. The owner is always re-attached, so an
    /// update can never move an expense to another user. A new name is
    /// trimmed as on create.
    pub async fn update_expense(&self, id: &str, mut patch: ExpenseUpdate) -> Result<Expense> {
        let session = self.require_session().await?;
        self.verify_owner(&session, id).await?;

        patch.name = patch.name.map(|name| name.trim().to_string());
        if let Some(name) = patch.name.as_deref() {
            self.ensure_unique_name(&session, name, Some(id)).await?;
        }

        patch.user_id = Some(session.id.clone());
        let path = expense_path(id);
        let updated: Expense = handle_api_request(|| self.http.put(&path, &patch))
            .await
            .into_result()
            .map_err(ClientError::Transport)?;

        self.invalidate_expense(id).await;
        tracing::info!(expense_id = %id, "expense updated");
        Ok(updated)
    }

    pub async fn delete_expense(&self, id: &str) -> Result<()> {
        let session = self.require_session().await?;
        self.verify_owner(&session, id).await?;

        let path = expense_path(id);
        handle_api_request(|| self.http.delete(&path))
            .await
            .into_result()
            .map_err(ClientError::Transport)?;

        self.invalidate_expense(id).await;
        tracing::info!(expense_id = %id, "expense deleted");
        Ok(())
    }

    async fn fetch_owned(&self, owner: &str) -> ApiResponse<Vec<Expense>> {
        let query = OwnerQuery { user_id: owner };
        handle_api_request(|| self.http.get_query(EXPENSES_PATH, &query)).await
    }

    async fn fetch_expense(&self, id: &str) -> ApiResponse<Expense> {
        let path = expense_path(id);
        handle_api_request(|| self.http.get(&path)).await
    }

    /// Uncached re-read of the target, then the ownership check.
    async fn verify_owner(&self, session: &Session, id: &str) -> Result<Expense> {
        let current = self
            .fetch_expense(id)
            .await
            .into_result()
            .map_err(ClientError::Transport)?;
        ensure_owner(&current, session)?;
        Ok(current)
    }

    /// Scans the owner's expenses (uncached) for a name clash, ignoring
    /// `exclude_id`.
    async fn ensure_unique_name(
        &self,
        session: &Session,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<()> {
        let existing = self
            .fetch_owned(&session.id)
            .await
            .into_result()
            .map_err(ClientError::Transport)?;
        let existing = owned_by(existing, &session.id);

        if find_duplicate(&existing, name, exclude_id).is_some() {
            return Err(ClientError::DuplicateName(name.trim().to_string()));
        }
        Ok(())
    }

    async fn invalidate_expense(&self, id: &str) {
        self.expense_lists.invalidate(&QueryKey::Expenses).await;
        self.expenses.invalidate(&QueryKey::expense(id)).await;
    }
}

fn expense_path(id: &str) -> String {
    format!("{EXPENSES_PATH}/{id}")
}

fn ensure_owner(expense: &Expense, session: &Session) -> Result<()> {
    if expense.user_id != session.id {
        tracing::warn!(
            expense_id = %expense.id,
            user_id = %session.id,
            "expense belongs to another user"
        );
        return Err(ClientError::Unauthorized);
    }
    Ok(())
}

/// The backend's `userId` filter matches substrings, so the result is
/// narrowed to exact owner matches.
fn owned_by(expenses: Vec<Expense>, owner: &str) -> Vec<Expense> {
    expenses
        .into_iter()
        .filter(|expense| expense.user_id == owner)
        .collect()
}

/// Comparison key for names: trimmed, NFKC-normalized, lowercased.
fn name_key(name: &str) -> String {
    name.trim().nfkc().flat_map(char::to_lowercase).collect()
}

fn find_duplicate<'a>(
    expenses: &'a [Expense],
    name: &str,
    exclude_id: Option<&str>,
) -> Option<&'a Expense> {
    let key = name_key(name);
    expenses
        .iter()
        .filter(|expense| Some(expense.id.as_str()) != exclude_id)
        .find(|expense| name_key(&expense.name) == key)
}
