use client::{ClientError, Notice, Route};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Client(#[from] ClientError),
    /// A failed operation already turned into its user-facing notice.
    #[error("{notice}")]
    Notice {
        notice: Notice,
        route: Option<Route>,
    },
    #[error("{0}")]
    Usage(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// What the user should do next, for failures that name one.
    pub fn hint(&self) -> Option<&'static str> {
        let route = match self {
            Self::Client(err) => err.fallback_route(),
            Self::Notice { route, .. } => *route,
            _ => None,
        }?;
        Some(match route {
            Route::Login => "Run `expenses login <username>` first.",
            Route::Back => "Run `expenses list` to see the expenses you own.",
        })
    }
}

#[cfg(test)]
mod tests {
    use client::Operation;

    use super::*;

    #[test]
    fn hints_follow_fallback_route() {
        let err = AppError::from(ClientError::Unauthenticated);
        assert_eq!(err.hint(), Some("Run `expenses login <username>` first."));

        let err = AppError::from(ClientError::Unauthorized);
        assert_eq!(
            err.hint(),
            Some("Run `expenses list` to see the expenses you own.")
        );

        let err = AppError::Notice {
            notice: Notice::failure(Operation::DeleteExpense, &ClientError::Unauthorized),
            route: ClientError::Unauthorized.fallback_route(),
        };
        assert_eq!(
            err.hint(),
            Some("Run `expenses list` to see the expenses you own.")
        );

        let err = AppError::from(ClientError::Transport("boom".to_string()));
        assert_eq!(err.hint(), None);
    }
}
