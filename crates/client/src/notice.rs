//! User-facing notifications for auth and mutation outcomes.
//!
//! These are presentation only: the client never emits them itself, callers
//! build one from the result of an operation and show it however they like.
use std::fmt;

use crate::error::ClientError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Login,
    Signup,
    Logout,
    CreateExpense,
    UpdateExpense,
    DeleteExpense,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(op: Operation) -> Self {
        let (title, message) = match op {
            Operation::Login => ("Login Successful", "Welcome back!"),
            Operation::Signup => (
                "Account Created",
                "Your account has been successfully created!",
            ),
            Operation::Logout => ("Logged Out", "You have been successfully logged out"),
            Operation::CreateExpense => ("Expense Added", "Your expense has been saved"),
            Operation::UpdateExpense => ("Expense Updated", "Your changes have been saved"),
            Operation::DeleteExpense => ("Expense Deleted", "The expense has been removed"),
        };
        Self {
            level: NoticeLevel::Success,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    /// Auth failures show the error text; expense failures keep it only for
    /// errors the user can act on and fall back to a generic retry hint.
    pub fn failure(op: Operation, err: &ClientError) -> Self {
        let title = match op {
            Operation::Login => "Login Failed",
            Operation::Signup => "Signup Failed",
            Operation::Logout => "Logout Failed",
            Operation::CreateExpense | Operation::UpdateExpense | Operation::DeleteExpense => {
                "Error"
            }
        };

        let message = match (op, err) {
            (Operation::Login | Operation::Signup | Operation::Logout, err) => err.to_string(),
            (
                _,
                ClientError::DuplicateName(_)
                | ClientError::Unauthenticated
                | ClientError::Unauthorized,
            ) => err.to_string(),
            (Operation::CreateExpense, _) => "Failed to create expense. Please try again.".to_string(),
            (Operation::UpdateExpense, _) => "Failed to update expense. Please try again.".to_string(),
            (Operation::DeleteExpense, _) => "Failed to delete expense. Please try again.".to_string(),
        };

        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message,
        }
    }

    pub fn from_result<T>(op: Operation, result: &Result<T, ClientError>) -> Self {
        match result {
            Ok(_) => Self::success(op),
            Err(err) => Self::failure(op, err),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_notices() {
        assert_eq!(
            Notice::success(Operation::Login).to_string(),
            "Login Successful: Welcome back!"
        );
        let failed = Notice::failure(Operation::Login, &ClientError::InvalidCredentials);
        assert_eq!(failed.level, NoticeLevel::Error);
        assert_eq!(failed.title, "Login Failed");
        assert_eq!(failed.message, "Invalid username or password");
    }

    #[test]
    fn expense_failures_hide_transport_detail() {
        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(
            Notice::failure(Operation::DeleteExpense, &err).message,
            "Failed to delete expense. Please try again."
        );

        let dup = ClientError::DuplicateName("Rent".to_string());
        assert_eq!(
            Notice::failure(Operation::CreateExpense, &dup).message,
            "An expense named \"Rent\" already exists"
        );
    }

    #[test]
    fn from_result_picks_level() {
        let ok: Result<(), ClientError> = Ok(());
        assert_eq!(
            Notice::from_result(Operation::Logout, &ok).level,
            NoticeLevel::Success
        );
        let err: Result<(), ClientError> = Err(ClientError::Unauthorized);
        assert_eq!(
            Notice::from_result(Operation::UpdateExpense, &err).message,
            "You are not allowed to access this expense"
        );
    }
}
