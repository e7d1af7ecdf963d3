//! HTTP client for the model host: token exchange, deployment discovery, inference calls

use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;
use tracing::info;

use super::ProxySettings;
use crate::errors::Result;
use crate::errors::VecRagError;

/// API version passed to OpenAI compatible deployment endpoints
pub const INFERENCE_API_VERSION: &str = "2023-05-15";

const RESOURCE_GROUP_HEADER: &str = "AI-Resource-Group";
const RUNNING_STATUS: &str = "RUNNING";

/// Tokens are refreshed this long before they expire
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now.checked_add(TOKEN_REFRESH_MARGIN)
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

/// Expiry of a token issued at `issued_at`; a lifetime that overflows the clock is already stale
fn token_expiry(issued_at: Instant, expires_in: u64) -> Instant {
    issued_at
        .checked_add(Duration::from_secs(expires_in))
        .unwrap_or(issued_at)
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct DeploymentList {
    #[serde(default)]
    resources: Vec<Deployment>,
}

/// A model deployment on the host
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    #[serde(default)]
    pub deployment_url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: Option<DeploymentDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentDetails {
    #[serde(default)]
    pub resources: Option<DeploymentResources>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentResources {
    #[serde(default, alias = "backendDetails")]
    pub backend_details: Option<BackendDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendDetails {
    #[serde(default)]
    pub model: Option<BackendModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendModel {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Deployment {
    /// Name of the model served by this deployment
    pub fn model_name(&self) -> Option<&str> {
        self.details
            .as_ref()?
            .resources
            .as_ref()?
            .backend_details
            .as_ref()?
            .model
            .as_ref()
            .map(|model| model.name.as_str())
    }

    pub fn is_running(&self) -> bool {
        self.status == RUNNING_STATUS && !self.deployment_url.is_empty()
    }

    /// Inference URL for a path below the deployment
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}?api-version={INFERENCE_API_VERSION}",
            self.deployment_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Pick the first running deployment serving `model_name`
pub fn select_deployment<'a>(deployments: &'a [Deployment], model_name: &str) -> Option<&'a Deployment> {
    deployments
        .iter()
        .find(|d| d.is_running() && d.model_name() == Some(model_name))
}

/// Authenticated client for the model host
pub struct ProxyClient {
    settings: ProxySettings,
    client: Client,
    token: Mutex<Option<AccessToken>>,
}

impl ProxyClient {
    /// Create a new proxy client. Requests carry no client-side timeout.
    ///
    /// # Errors
    /// - HTTP client build errors (invalid TLS configuration)
    pub fn new(settings: ProxySettings) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            settings,
            client,
            token: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    /// Bearer token for the service, fetched with client credentials and cached until near expiry
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting access token from {}", self.settings.token_url());
        let response = self
            .client
            .post(self.settings.token_url())
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VecRagError::ProxyError(format!(
                "Token request failed ({status}): {error_text}"
            )));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            VecRagError::ProxyError(format!("Failed to parse token response: {e}"))
        })?;

        let token = AccessToken {
            value: body.access_token,
            expires_at: token_expiry(Instant::now(), body.expires_in),
        };
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(request
            .bearer_auth(token)
            .header(RESOURCE_GROUP_HEADER, &self.settings.resource_group))
    }

    /// List deployments visible in the resource group
    pub async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        let request = self
            .authorized(self.client.get(self.settings.deployments_url()))
            .await?;
        let list: DeploymentList = send_json(request).await?;
        debug!("Found {} deployments", list.resources.len());
        Ok(list.resources)
    }

    /// Resolve a model name to a running deployment
    ///
    /// # Errors
    /// - `ModelNotFound` when no running deployment serves the model
    pub async fn resolve_deployment(&self, model_name: &str) -> Result<Deployment> {
        let deployments = self.list_deployments().await?;
        let deployment = select_deployment(&deployments, model_name)
            .cloned()
            .ok_or_else(|| VecRagError::ModelNotFound(model_name.to_string()))?;
        info!(
            "Resolved model {} to deployment {}",
            model_name, deployment.id
        );
        Ok(deployment)
    }

    /// POST a JSON body to a deployment endpoint and decode the JSON reply
    pub async fn post_deployment<B, R>(&self, deployment: &Deployment, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = deployment.endpoint(path);
        debug!("Calling deployment endpoint: {}", url);
        let request = self.authorized(self.client.post(&url).json(body)).await?;
        send_json(request).await
    }
}

async fn send_json<R: DeserializeOwned>(request: RequestBuilder) -> Result<R> {
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(VecRagError::ProxyError(format!(
            "Model host error ({status}): {error_text}"
        )));
    }

    response
        .json()
        .await
        .map_err(|e| VecRagError::ProxyError(format!("Failed to parse response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYMENTS: &str = r#"{
        "count": 3,
        "resources": [
            {
                "id": "d-stopped",
                "deploymentUrl": "https://api.ai.example.com/v2/inference/deployments/d-stopped",
                "status": "STOPPED",
                "details": {"resources": {"backend_details": {"model": {"name": "gpt-4", "version": "latest"}}}}
            },
            {
                "id": "d-gpt4",
                "deploymentUrl": "https://api.ai.example.com/v2/inference/deployments/d-gpt4",
                "status": "RUNNING",
                "details": {"resources": {"backend_details": {"model": {"name": "gpt-4", "version": "latest"}}}}
            },
            {
                "id": "d-ada",
                "deploymentUrl": "https://api.ai.example.com/v2/inference/deployments/d-ada/",
                "status": "RUNNING",
                "details": {"resources": {"backendDetails": {"model": {"name": "text-embedding-ada-002"}}}}
            },
            {
                "id": "d-pending",
                "status": "PENDING"
            }
        ]
    }"#;

    fn deployments() -> Vec<Deployment> {
        serde_json::from_str::<DeploymentList>(DEPLOYMENTS)
            .unwrap()
            .resources
    }

    #[test]
    fn test_select_running_deployment() {
        let deployments = deployments();
        let selected = select_deployment(&deployments, "gpt-4").unwrap();
        assert_eq!(selected.id, "d-gpt4");
    }

    #[test]
    fn test_select_accepts_camel_case_backend_details() {
        let deployments = deployments();
        let selected = select_deployment(&deployments, "text-embedding-ada-002").unwrap();
        assert_eq!(selected.id, "d-ada");
    }

    #[test]
    fn test_unknown_model_selects_nothing() {
        let deployments = deployments();
        assert!(select_deployment(&deployments, "claude").is_none());
    }

    #[test]
    fn test_deployment_without_details() {
        let deployments = deployments();
        let pending = deployments.iter().find(|d| d.id == "d-pending").unwrap();
        assert!(pending.model_name().is_none());
        assert!(!pending.is_running());
    }

    #[test]
    fn test_endpoint_joins_path_and_version() {
        let deployments = deployments();
        let ada = select_deployment(&deployments, "text-embedding-ada-002").unwrap();
        assert_eq!(
            ada.endpoint("/embeddings"),
            "https://api.ai.example.com/v2/inference/deployments/d-ada/embeddings?api-version=2023-05-15"
        );
    }

    #[test]
    fn test_token_freshness() {
        let now = Instant::now();
        let fresh = AccessToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(3600),
        };
        let stale = AccessToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(30),
        };
        assert!(fresh.is_fresh(now));
        assert!(!stale.is_fresh(now));
    }

    #[test]
    fn test_huge_token_lifetime_is_stale() {
        let now = Instant::now();
        let token = AccessToken {
            value: "t".to_string(),
            expires_at: token_expiry(now, u64::MAX),
        };
        assert!(!token.is_fresh(now));
        assert_eq!(token_expiry(now, 120), now + Duration::from_secs(120));
    }

    #[test]
    fn test_client_has_no_request_timeout() {
        let settings = ProxySettings {
            auth_url: "https://tenant.authentication.example.com".to_string(),
            client_id: "sb-client".to_string(),
            client_secret: "client-secret".to_string(),
            resource_group: "myapp".to_string(),
            base_url: "https://api.ai.example.com/v2".to_string(),
        };
        let proxy = ProxyClient::new(settings).unwrap();
        assert!(!format!("{:?}", proxy.client).contains("timeout"));
    }

    #[test]
    fn test_token_response_default_expiry() {
        let body: TokenResponse = serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(body.access_token, "abc");
        assert_eq!(body.expires_in, 3600);
    }
}
