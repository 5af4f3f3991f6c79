//! Exchange-rate API key lookup

use crate::core::config::AppConfig;
use std::fmt::Display;
use tracing::{info, warn};

pub const PRIMARY_ENV_VAR: &str = "CURRENCY_API_KEY";
pub const ALIAS_ENV_VAR: &str = "API_KEY";

/// Shared demo key of the public exchangerate-api.com account. Only used when
/// nothing else is configured, and the app reports itself as running in demo mode.
const BUILT_IN_KEY: &str = "d0167997ec8327b93457e268";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment(&'static str),
    ConfigFile,
    BuiltIn,
}

impl Display for ApiKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKeySource::Environment(var) => write!(f, "environment variable {var}"),
            ApiKeySource::ConfigFile => write!(f, "config file"),
            ApiKeySource::BuiltIn => write!(f, "built-in demo key"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    source: ApiKeySource,
}

impl ApiKey {
    pub fn new(value: impl Into<String>, source: ApiKeySource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> &ApiKeySource {
        &self.source
    }

    pub fn is_demo(&self) -> bool {
        self.source == ApiKeySource::BuiltIn
    }
}

// Keep the secret out of debug logs
impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolves the API key from the process environment, then the config file,
/// then the built-in demo key.
pub fn resolve_api_key(config: &AppConfig) -> ApiKey {
    resolve_api_key_with(|name| std::env::var(name).ok(), config)
}

pub fn resolve_api_key_with<F>(lookup_env: F, config: &AppConfig) -> ApiKey
where
    F: Fn(&str) -> Option<String>,
{
    for var in [PRIMARY_ENV_VAR, ALIAS_ENV_VAR] {
        if let Some(value) = lookup_env(var).filter(|v| !v.trim().is_empty()) {
            info!(source = var, "API key loaded from environment variables");
            return ApiKey::new(value.trim(), ApiKeySource::Environment(var));
        }
    }

    if let Some(value) = config.api_key.as_deref().filter(|v| !v.trim().is_empty()) {
        info!("API key loaded from config file");
        return ApiKey::new(value.trim(), ApiKeySource::ConfigFile);
    }

    warn!(
        "No API key configured, using the shared demo key. Set {} or api_key in the config file",
        PRIMARY_ENV_VAR
    );
    ApiKey::new(BUILT_IN_KEY, ApiKeySource::BuiltIn)
}
