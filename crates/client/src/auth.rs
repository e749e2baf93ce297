use api_types::user::{User, UserNew};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::{
    ExpenseClient,
    cache::QueryKey,
    error::{ClientError, Result},
    executor::{ApiResponse, handle_api_request},
    session::Session,
};

const USERS_PATH: &str = "/users";
const SIGNUP_FAILED: &str = "Failed to create account. Please try again.";

#[derive(Serialize)]
struct UsernameQuery<'a> {
    username: &'a str,
}

impl ExpenseClient {
    /// Logs in with a plain username/password pair.
    ///
    /// Any failure (no such user, wrong password, backend unreachable) is
    /// reported as [`ClientError::InvalidCredentials`] and leaves the current
    /// session as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let users = self
            .find_users(username)
            .await
            .into_result()
            .map_err(|_| ClientError::InvalidCredentials)?;

        let user = users
            .iter()
            .find(|user| user.username == username)
            .ok_or(ClientError::InvalidCredentials)?;

        // The backend stores and returns the password as-is.
        if user.password != password {
            return Err(ClientError::InvalidCredentials);
        }

        let session = self.establish(user).await?;
        tracing::info!(user_id = %session.id, "logged in");
        Ok(session)
    }

    /// Creates an account and logs in as it.
    ///
    /// The existence check and the create are separate requests; two signups
    /// racing on the same name can both pass the check.
    pub async fn signup(&self, username: &str, password: &str) -> Result<Session> {
        let existing = self.find_users(username).await;
        if let Some(users) = existing.data.as_deref()
            && users.iter().any(|user| user.username == username)
        {
            return Err(ClientError::DuplicateUsername);
        }

        let payload = UserNew {
            username: username.to_string(),
            password: password.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let user: User = handle_api_request(|| self.http.post(USERS_PATH, &payload))
            .await
            .into_result()
            .map_err(|_| ClientError::Transport(SIGNUP_FAILED.to_string()))?;

        let session = self.establish(&user).await?;
        tracing::info!(user_id = %session.id, "account created");
        Ok(session)
    }

    /// Drops the session and every cached result. Never fails: a store that
    /// cannot be cleaned is logged and memory is cleared anyway.
    pub async fn logout(&self) {
        if let Err(err) = self.session.logout().await {
            tracing::error!("failed to remove persisted session: {err}");
        }
        self.clear_caches().await;
        tracing::info!("logged out");
    }

    pub async fn current_user(&self) -> Option<Session> {
        self.session.authenticated_user().await
    }

    async fn find_users(&self, username: &str) -> ApiResponse<Vec<User>> {
        let query = UsernameQuery { username };
        handle_api_request(|| self.http.get_query(USERS_PATH, &query)).await
    }

    /// Persists the session first so nothing is marked authenticated unless
    /// it will survive a restart. Results cached for a previous user are
    /// dropped and the user entry is seeded with the new session.
    async fn establish(&self, user: &User) -> Result<Session> {
        let session = Session::from(user);
        self.session.persist(&session)?;
        self.clear_caches().await;
        self.session.set_user(Some(session.clone())).await;
        self.session.set_is_authenticated(true).await;
        self.user.set(QueryKey::User, session.clone()).await;
        Ok(session)
    }
}
