//! Errors surfaced by the access layer.
//!
//! Transport failures are absorbed by the request executor and only show up
//! here as [`Transport`] once a caller turns an unsuccessful response into an
//! error. Every other variant is raised by the access layer itself.
//!
//!  [`Transport`]: ClientError::Transport
use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("You need to log in first")]
    Unauthenticated,
    #[error("You are not allowed to access this expense")]
    Unauthorized,
    #[error("An expense named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("config error: {0}")]
    Config(String),
}

/// Where a caller should send the user after a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Back,
}

impl ClientError {
    pub fn fallback_route(&self) -> Option<Route> {
        match self {
            Self::Unauthenticated => Some(Route::Login),
            Self::Unauthorized => Some(Route::Back),
            _ => None,
        }
    }
}

impl PartialEq for ClientError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transport(a), Self::Transport(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::DuplicateUsername, Self::DuplicateUsername) => true,
            (Self::Unauthenticated, Self::Unauthenticated) => true,
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::DuplicateName(a), Self::DuplicateName(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            (Self::Config(a), Self::Config(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_route_away() {
        assert_eq!(
            ClientError::Unauthenticated.fallback_route(),
            Some(Route::Login)
        );
        assert_eq!(ClientError::Unauthorized.fallback_route(), Some(Route::Back));
        assert_eq!(
            ClientError::DuplicateName("Lunch".to_string()).fallback_route(),
            None
        );
        assert_eq!(
            ClientError::Transport("timeout".to_string()).fallback_route(),
            None
        );
    }
}
