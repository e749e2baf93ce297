use std::{sync::Arc, time::Duration};

use api_types::ErrorBody;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::ClientConfig,
    error::{ClientError, Result},
    session::Session,
    store::{KeyValueStore, SESSION_KEY},
};

/// Failure of a single HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Network(err) => err.status(),
            Self::Server { status, .. } => Some(*status),
        }
    }

    /// Message shown to the user: the backend's own message when it sent one,
    /// otherwise a description of what went wrong on the wire.
    pub fn message(&self) -> String {
        match self {
            Self::Network(err) if err.is_timeout() => "Request timed out".to_string(),
            Self::Network(err) => err.to_string(),
            Self::Server { message, .. } => message.clone(),
        }
    }
}

/// Thin wrapper over `reqwest` bound to one base endpoint.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let base_url = reqwest::Url::parse(&config.base_url)
            .map_err(|err| ClientError::Config(format!("invalid base_url: {err}")))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ClientError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Bearer value for the persisted session, if any.
    ///
    /// The store is read on every request so a session written or removed
    /// elsewhere is picked up without rebuilding the client.
    fn bearer(&self) -> Option<String> {
        let raw = match self.store.get(SESSION_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!("failed to read stored session: {err}");
                return None;
            }
        };
        serde_json::from_str::<Session>(&raw)
            .ok()
            .map(|session| format!("Bearer {}", session.credential()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("Making {method} request to: {url}");

        let mut req = self.client.request(method, url);
        if let Some(bearer) = self.bearer() {
            match header::HeaderValue::try_from(bearer) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    req = req.header(header::AUTHORIZATION, value);
                }
                Err(err) => tracing::warn!("invalid bearer header value: {err}"),
            }
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> std::result::Result<reqwest::Response, RequestError> {
        let resp = req.send().await.map_err(|err| {
            tracing::error!("API error: {err}");
            RequestError::Network(err)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = error_message(status, resp.text().await.ok().as_deref());
        tracing::error!("API error: {status} {message}");

        if status == StatusCode::UNAUTHORIZED {
            if let Err(err) = self.store.remove(SESSION_KEY) {
                tracing::warn!("failed to drop stored session after 401: {err}");
            }
        }

        Err(RequestError::Server { status, message })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> std::result::Result<T, RequestError> {
        let resp = self.send(req).await?;
        Ok(resp.json::<T>().await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, RequestError> {
        self.send_json(self.request(Method::GET, path)).await
    }

    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> std::result::Result<T, RequestError> {
        self.send_json(self.request(Method::GET, path).query(query))
            .await
    }

    pub async fn post<TReq: Serialize + ?Sized, TResp: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> std::result::Result<TResp, RequestError> {
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn put<TReq: Serialize + ?Sized, TResp: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> std::result::Result<TResp, RequestError> {
        self.send_json(self.request(Method::PUT, path).json(body))
            .await
    }

    /// Issues a `DELETE`; the response body is ignored.
    pub async fn delete(&self, path: &str) -> std::result::Result<(), RequestError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Extracts a message from an error body.
///
/// Accepts `{ "message": .. }`, `{ "error": .. }` or a bare JSON string, and
/// falls back to a generic status description.
fn error_message(status: StatusCode, body: Option<&str>) -> String {
    let from_body = body.and_then(|raw| {
        if let Ok(body) = serde_json::from_str::<ErrorBody>(raw)
            && let Some(message) = body.into_message()
        {
            return Some(message);
        }
        serde_json::from_str::<String>(raw)
            .ok()
            .filter(|msg| !msg.trim().is_empty())
    });

    from_body.unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
}
