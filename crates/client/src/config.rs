use serde::Deserialize;

/// Hosted REST backend every request goes to unless overridden.
pub const DEFAULT_BASE_URL: &str = "https://67ac71475853dfff53dab929.mockapi.io/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORE_PATH: &str = "config/expenses_state.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout. Expiry surfaces as a transport error.
    pub timeout_secs: u64,
    /// JSON file backing the local key-value store.
    pub store_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            store_path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}
