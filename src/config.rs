use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

/// Environment variable overriding `database.password`
pub const ENV_DATABASE_PASSWORD: &str = "VECRAG_DATABASE_PASSWORD";
/// Environment variable overriding `gen_ai_hub.clientsecret`
pub const ENV_CLIENT_SECRET: &str = "VECRAG_CLIENT_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// PEM encoded certificate used to verify the server. Plain TCP when absent.
    #[serde(default)]
    pub certificate: Option<String>,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUrls {
    #[serde(rename = "AI_API_URL")]
    pub ai_api_url: String,
}

/// Service key of the generative AI hub, field names as issued by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiHubServiceKey {
    pub url: String,
    #[serde(rename = "clientid")]
    pub client_id: String,
    #[serde(rename = "clientsecret")]
    pub client_secret: String,
    #[serde(rename = "appname")]
    pub app_name: String,
    #[serde(rename = "serviceurls")]
    pub service_urls: ServiceUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents handed to the prompt
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    crate::vectorstore::DEFAULT_K
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub gen_ai_hub: GenAiHubServiceKey,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::VecRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Load from an explicit path when given, otherwise from the default locations
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Replace secrets with values looked up by variable name
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(password) = lookup(ENV_DATABASE_PASSWORD) {
            self.database.password = password;
        }
        if let Some(secret) = lookup(ENV_CLIENT_SECRET) {
            self.gen_ai_hub.client_secret = secret;
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if self.database.host.is_empty() {
            return Err(crate::VecRagError::ConfigError(
                "database.host must not be empty".to_string(),
            ));
        }
        if self.gen_ai_hub.app_name.is_empty() {
            return Err(crate::VecRagError::ConfigError(
                "gen_ai_hub.appname must not be empty".to_string(),
            ));
        }
        if self.retrieval.k == 0 {
            return Err(crate::VecRagError::ConfigError(
                "retrieval.k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get retrieval depth
    pub fn retrieval_k(&self) -> usize {
        self.retrieval.k
    }

    /// Get logging level
    pub fn log_level(&self) -> &str {
        &self.logging.level
    }
}
