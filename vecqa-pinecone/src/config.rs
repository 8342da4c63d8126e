use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::client::PineconeHttpClient;
use crate::mapper::host_to_base_url;
use crate::store::PineconeVectorStore;
use crate::types::{IndexDescription, IndexStatsResponse, Metric};
use crate::PineconeStoreError;

pub const DEFAULT_CONTROL_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_DIMENSION: usize = 1536;

#[derive(Clone)]
pub struct PineconeStoreBuilder {
    api_key: Option<String>,
    host: Option<String>,
    control_url: String,
    index_name: Option<String>,
    namespace: Option<String>,
    dimension: usize,
    metric: Metric,
    timeout: Option<Duration>,
    validate_dimension: bool,
}

impl fmt::Debug for PineconeStoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("PineconeStoreBuilder")
            .field("api_key", &api_key)
            .field("host", &self.host)
            .field("control_url", &self.control_url)
            .field("index_name", &self.index_name)
            .field("namespace", &self.namespace)
            .field("dimension", &self.dimension)
            .field("metric", &self.metric)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for PineconeStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PineconeStoreBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            host: None,
            control_url: DEFAULT_CONTROL_URL.to_string(),
            index_name: None,
            namespace: None,
            dimension: DEFAULT_DIMENSION,
            metric: Metric::default(),
            timeout: None,
            validate_dimension: false,
        }
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(value.into());
        self
    }

    /// Data-plane URL of the index. When unset, `build` resolves it from
    /// `index_name` through the control plane.
    pub fn host(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.host = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
        self
    }

    pub fn control_url(mut self, value: impl Into<String>) -> Self {
        self.control_url = value.into();
        self
    }

    pub fn index_name(mut self, value: impl Into<String>) -> Self {
        self.index_name = Some(value.into());
        self
    }

    pub fn namespace(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.namespace = if value.is_empty() { None } else { Some(value) };
        self
    }

    pub fn dimension(mut self, value: usize) -> Self {
        self.dimension = value;
        self
    }

    pub fn metric(mut self, value: Metric) -> Self {
        self.metric = value;
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    /// Only consulted when `host` is set; resolved indexes are always checked.
    pub fn validate_dimension(mut self, value: bool) -> Self {
        self.validate_dimension = value;
        self
    }

    fn http_client(
        &self,
        base_url: String,
        api_key: String,
    ) -> Result<PineconeHttpClient, PineconeStoreError> {
        match self.timeout {
            Some(timeout) => PineconeHttpClient::with_timeout(base_url, api_key, timeout),
            None => PineconeHttpClient::new(base_url, api_key),
        }
    }

    pub async fn build(self) -> Result<PineconeVectorStore, PineconeStoreError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| PineconeStoreError::Config("api_key is required".to_string()))?;
        if self.dimension == 0 {
            return Err(PineconeStoreError::Config(
                "dimension must be greater than 0".to_string(),
            ));
        }

        let client = match &self.host {
            Some(host) => {
                let client = self.http_client(host_to_base_url(host), api_key)?;
                if self.validate_dimension {
                    self.check_index_stats(&client).await;
                }
                client
            }
            None => {
                let index_name = self.index_name.as_deref().ok_or_else(|| {
                    PineconeStoreError::Config(
                        "either host or index_name is required".to_string(),
                    )
                })?;
                let description = self.describe_index(index_name, api_key.clone()).await?;
                self.check_description(&description);
                self.http_client(host_to_base_url(&description.host), api_key)?
            }
        };

        tracing::info!(
            index_name = ?self.index_name,
            namespace = ?self.namespace,
            base_url = %client.base_url(),
            dimension = self.dimension,
            metric = %self.metric,
            "pinecone vector store ready"
        );

        Ok(PineconeVectorStore::new(
            client,
            self.index_name,
            self.namespace,
            self.dimension,
            self.metric,
        ))
    }

    async fn describe_index(
        &self,
        index_name: &str,
        api_key: String,
    ) -> Result<IndexDescription, PineconeStoreError> {
        let control = self.http_client(self.control_url.clone(), api_key)?;
        control
            .get_typed::<IndexDescription>(&format!("/indexes/{index_name}"))
            .await
            .map_err(|err| match err {
                PineconeStoreError::Api { status: 404, .. } => PineconeStoreError::IndexNotFound {
                    index_name: index_name.to_string(),
                },
                other => other,
            })
    }

    fn check_description(&self, description: &IndexDescription) {
        if let Some(index_dim) = description.dimension {
            if index_dim != self.dimension {
                tracing::warn!(
                    index_name = %description.name,
                    index_dim = index_dim,
                    configured_dim = self.dimension,
                    "configured dimension differs from pinecone index dimension"
                );
            }
        }

        if let Some(metric) = description.metric.as_deref() {
            if metric.parse::<Metric>().ok() != Some(self.metric) {
                tracing::warn!(
                    index_name = %description.name,
                    index_metric = %metric,
                    configured_metric = %self.metric,
                    "configured metric differs from pinecone index metric"
                );
            }
        }

        if let Some(status) = &description.status {
            if !status.ready {
                tracing::warn!(
                    index_name = %description.name,
                    state = ?status.state,
                    "pinecone index is not ready"
                );
            }
        }
    }

    async fn check_index_stats(&self, client: &PineconeHttpClient) {
        let response = client
            .post_typed::<Value, IndexStatsResponse>(
                "/describe_index_stats",
                &Value::Object(serde_json::Map::new()),
            )
            .await;

        match response {
            Ok(stats) => match stats.dimension {
                Some(index_dim) if index_dim != self.dimension => {
                    tracing::warn!(
                        index_name = ?self.index_name,
                        namespace = ?self.namespace,
                        index_dim = index_dim,
                        configured_dim = self.dimension,
                        "configured dimension differs from pinecone index dimension"
                    );
                }
                Some(_) => {}
                None => {
                    tracing::warn!("pinecone describe_index_stats response missing 'dimension'");
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to validate pinecone index dimension");
            }
        }
    }
}
