//! Uniform result shape for every outbound call.
use std::future::Future;

use crate::http::RequestError;

const FALLBACK_MESSAGE: &str = "An error occurred";

/// Outcome of one request: either `data` with `success == true`, or an
/// `error` message with `success == false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub success: bool,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            data: None,
            success: false,
            error: Some(message),
        }
    }

    /// Converts into a `Result`, taking the error message on failure.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.error.unwrap_or_else(|| FALLBACK_MESSAGE.to_string())),
        }
    }
}

/// Runs `op` once and folds its outcome into an [`ApiResponse`].
///
/// Failures are logged and returned as values; nothing is retried.
pub async fn handle_api_request<T, F, Fut>(op: F) -> ApiResponse<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, RequestError>>,
{
    match op().await {
        Ok(data) => ApiResponse::ok(data),
        Err(err) => {
            let message = err.message();
            tracing::error!(status = ?err.status(), "API request failed: {message}");
            ApiResponse::failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn success_wraps_data() {
        let res = handle_api_request(|| async { Ok::<_, RequestError>(5) }).await;
        assert_eq!(res, ApiResponse::ok(5));
        assert_eq!(res.into_result(), Ok(5));
    }

    #[tokio::test]
    async fn server_error_becomes_message() {
        let res: ApiResponse<u32> = handle_api_request(|| async {
            Err(RequestError::Server {
                status: StatusCode::NOT_FOUND,
                message: "Not found".to_string(),
            })
        })
        .await;
        assert!(!res.success);
        assert_eq!(res.data, None);
        assert_eq!(res.error.as_deref(), Some("Not found"));
    }

    #[tokio::test]
    async fn empty_message_uses_fallback() {
        let res: ApiResponse<u32> = handle_api_request(|| async {
            Err(RequestError::Server {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "  ".to_string(),
            })
        })
        .await;
        assert_eq!(res.into_result(), Err(FALLBACK_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn op_runs_exactly_once() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let _: ApiResponse<()> = handle_api_request(|| async {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(RequestError::Server {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "down".to_string(),
            })
        })
        .await;
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
