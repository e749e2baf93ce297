use client::ClientConfig;
use serde::Deserialize;

use crate::{cli::Args, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/expenses.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub level: String,
    pub client: ClientConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            client: ClientConfig::default(),
        }
    }
}

/// File, then `EXPENSES_*` environment (`EXPENSES_CLIENT__BASE_URL`), then
/// command-line flags.
pub fn load(args: &Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix("EXPENSES")
            .prefix_separator("_")
            .separator("__"),
    );
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.client.base_url = base_url.clone();
    }
    if let Some(store) = &args.store {
        settings.client.store_path = store.clone();
    }
    if let Some(level) = &args.log_level {
        settings.level = level.clone();
    }

    Ok(settings)
}
