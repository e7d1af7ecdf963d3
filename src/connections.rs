//! Factories for the vector database connection and the model host clients
//!
//! Every call builds fresh handles; nothing is pooled or cached between calls.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgSslMode;
use sqlx::ConnectOptions;
use sqlx::PgConnection;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::ProxyEmbeddings;
use crate::errors::Result;
use crate::errors::VecRagError;
use crate::llm::ProxyChatModel;
use crate::proxy::ProxyClient;
use crate::proxy::ProxySettings;
use crate::vectorstore::PgVectorStore;

/// Builds database and model host handles from static secrets
#[derive(Clone)]
pub struct ConnectionFactory {
    config: Arc<AppConfig>,
}

impl ConnectionFactory {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Connection options for the vector database.
    ///
    /// With a certificate configured the server is verified against it,
    /// otherwise TLS is used when the server offers it.
    pub fn database_options(&self) -> PgConnectOptions {
        let db = &self.config.database;
        let options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.user)
            .password(&db.password);

        match &db.certificate {
            Some(pem) => options
                .ssl_mode(PgSslMode::VerifyFull)
                .ssl_root_cert_from_pem(pem.as_bytes().to_vec()),
            None => options.ssl_mode(PgSslMode::Prefer),
        }
    }

    async fn connect_database(&self) -> Result<PgConnection> {
        let timeout = Duration::from_secs(self.config.database.connect_timeout);
        debug!(
            "Connecting to vector database at {}:{}",
            self.config.database.host, self.config.database.port
        );
        tokio::time::timeout(timeout, self.database_options().connect())
            .await
            .map_err(|_| {
                VecRagError::Database(sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "timed out connecting to the vector database",
                )))
            })?
            .map_err(VecRagError::from)
    }

    /// Settings for the model host derived from the service key
    pub fn proxy_settings(&self) -> Result<ProxySettings> {
        ProxySettings::from_service_key(&self.config.gen_ai_hub)
    }

    /// Authenticated client for the model host
    pub fn get_model_host_proxy_client(&self) -> Result<Arc<ProxyClient>> {
        Ok(Arc::new(ProxyClient::new(self.proxy_settings()?)?))
    }

    /// Vector store bound to `table_name`, embedding with `embedding_model_name`
    ///
    /// # Errors
    /// - Database unreachable or credentials rejected
    /// - `ModelNotFound` when the embedding model has no running deployment
    pub async fn create_vector_store_client(
        &self,
        table_name: &str,
        embedding_model_name: &str,
    ) -> Result<PgVectorStore> {
        let proxy = self.get_model_host_proxy_client()?;
        let conn = self.connect_database().await?;
        let embeddings = ProxyEmbeddings::new(proxy, embedding_model_name).await?;
        let store = PgVectorStore::new(conn, table_name, Arc::new(embeddings)).await?;

        info!(
            "Vector store ready: table={}, embedding_model={}",
            store.table_name(),
            embedding_model_name
        );
        Ok(store)
    }

    /// Chat model client for `model_name`
    ///
    /// # Errors
    /// - `ModelNotFound` when the model has no running deployment
    pub async fn create_llm_client(&self, model_name: &str) -> Result<ProxyChatModel> {
        let proxy = self.get_model_host_proxy_client()?;
        let llm = ProxyChatModel::new(proxy, model_name, &self.config.llm).await?;
        info!("LLM client ready: model={}", model_name);
        Ok(llm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(certificate: Option<&str>) -> AppConfig {
        let mut content = String::from(
            r#"
[database]
host = "db.example.com"
port = 30015
user = "DBADMIN"
password = "secret"
"#,
        );
        if let Some(pem) = certificate {
            content.push_str(&format!("certificate = \"{pem}\"\n"));
        }
        content.push_str(
            r#"
[gen_ai_hub]
url = "https://tenant.authentication.example.com"
clientid = "sb-client"
clientsecret = "client-secret"
appname = "myapp!b1234"

[gen_ai_hub.serviceurls]
AI_API_URL = "https://api.ai.example.com"
"#,
        );
        toml::from_str(&content).unwrap()
    }

    #[test]
    fn test_database_options_from_secrets() {
        let factory = ConnectionFactory::new(Arc::new(config(None)));
        let options = factory.database_options();
        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 30015);
        assert_eq!(options.get_username(), "DBADMIN");
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Prefer));
    }

    #[test]
    fn test_certificate_enables_verification() {
        let factory = ConnectionFactory::new(Arc::new(config(Some("-----BEGIN CERTIFICATE-----"))));
        assert!(matches!(
            factory.database_options().get_ssl_mode(),
            PgSslMode::VerifyFull
        ));
    }

    #[test]
    fn test_proxy_settings_from_service_key() {
        let factory = ConnectionFactory::new(Arc::new(config(None)));
        let settings = factory.proxy_settings().unwrap();
        assert_eq!(settings.resource_group, "myapp");
        assert_eq!(settings.base_url, "https://api.ai.example.com/v2");
        assert!(factory.get_model_host_proxy_client().is_ok());
    }

    #[tokio::test]
    #[ignore = "Requires a reachable database and model host"]
    async fn test_create_clients_against_live_services() {
        let factory = ConnectionFactory::new(Arc::new(AppConfig::load().unwrap()));
        let store = factory
            .create_vector_store_client("RAG_EXAMPLE_VECTORSTORE", "text-embedding-ada-002")
            .await
            .unwrap();
        assert_eq!(store.table_name(), "RAG_EXAMPLE_VECTORSTORE");
        factory.create_llm_client("gpt-4").await.unwrap();
    }
}
