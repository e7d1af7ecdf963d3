//! Client side of the generative AI hub that hosts embedding and chat models
//!
//! Every model call goes through a proxy client that holds the service key
//! credentials, exchanges them for an OAuth token, and addresses a running
//! deployment of the requested model inside one resource group.

pub mod client;

use std::sync::Once;

pub use client::Deployment;
pub use client::ProxyClient;
use url::Url;

use crate::config::GenAiHubServiceKey;
use crate::errors::Result;
use crate::errors::VecRagError;

pub const ENV_AUTH_URL: &str = "AICORE_AUTH_URL";
pub const ENV_CLIENT_ID: &str = "AICORE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AICORE_CLIENT_SECRET";
pub const ENV_RESOURCE_GROUP: &str = "AICORE_RESOURCE_GROUP";
pub const ENV_BASE_URL: &str = "AICORE_BASE_URL";

/// Version segment appended to the service's API URL
pub const API_VERSION_SEGMENT: &str = "v2";

static EXPORT_ENV: Once = Once::new();

/// Resolved connection settings for the model host
#[derive(Clone)]
pub struct ProxySettings {
    pub auth_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub resource_group: String,
    pub base_url: String,
}

impl std::fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySettings")
            .field("auth_url", &self.auth_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("resource_group", &self.resource_group)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Resource group encoded in an application name: everything before the first `!`
pub fn resource_group_from_app_name(app_name: &str) -> &str {
    app_name.split('!').next().unwrap_or(app_name)
}

/// Versioned API root for a service URL
pub fn versioned_base_url(ai_api_url: &str) -> String {
    format!(
        "{}/{API_VERSION_SEGMENT}",
        ai_api_url.trim_end_matches('/')
    )
}

impl ProxySettings {
    /// Derive settings from a service key
    pub fn from_service_key(key: &GenAiHubServiceKey) -> Result<Self> {
        let settings = Self {
            auth_url: key.url.trim_end_matches('/').to_string(),
            client_id: key.client_id.clone(),
            client_secret: key.client_secret.clone(),
            resource_group: resource_group_from_app_name(&key.app_name).to_string(),
            base_url: versioned_base_url(&key.service_urls.ai_api_url),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Publish the settings as `AICORE_*` environment variables.
    ///
    /// Only the first call in a process writes; later calls are no-ops, so the
    /// environment never changes while requests are being served.
    pub fn export_env(&self) {
        EXPORT_ENV.call_once(|| {
            for (name, value) in self.env_pairs() {
                std::env::set_var(name, value);
            }
            tracing::debug!("Exported model host settings for {}", self.base_url);
        });
    }

    /// Variable name and value pairs published by [`ProxySettings::export_env`]
    pub fn env_pairs(&self) -> [(&'static str, &str); 5] {
        [
            (ENV_AUTH_URL, self.auth_url.as_str()),
            (ENV_CLIENT_ID, self.client_id.as_str()),
            (ENV_CLIENT_SECRET, self.client_secret.as_str()),
            (ENV_RESOURCE_GROUP, self.resource_group.as_str()),
            (ENV_BASE_URL, self.base_url.as_str()),
        ]
    }

    /// OAuth token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.auth_url)
    }

    /// Deployment listing endpoint
    pub fn deployments_url(&self) -> String {
        format!("{}/lm/deployments", self.base_url)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.auth_url)?;
        Url::parse(&self.base_url)?;
        if self.resource_group.is_empty() {
            return Err(VecRagError::ConfigError(
                "resource group derived from the application name is empty".to_string(),
            ));
        }
        Ok(())
    }
}
