use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::PineconeStoreError;

/// Pinecone REST API version pinned for every request.
pub const API_VERSION: &str = "2024-07";

#[derive(Clone)]
pub struct PineconeHttpClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for PineconeHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PineconeHttpClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl PineconeHttpClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, PineconeStoreError> {
        Self::with_http(base_url, api_key, Client::new())
    }

    pub fn with_timeout(
        base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, PineconeStoreError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PineconeStoreError::Config(format!("http client: {err}")))?;
        Self::with_http(base_url, api_key, http)
    }

    fn with_http(
        base_url: String,
        api_key: String,
        http: Client,
    ) -> Result<Self, PineconeStoreError> {
        if api_key.trim().is_empty() {
            return Err(PineconeStoreError::Config(
                "api_key cannot be empty".to_string(),
            ));
        }

        reqwest::Url::parse(&base_url)
            .map_err(|err| PineconeStoreError::Config(format!("invalid base_url: {err}")))?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    pub async fn post_typed<Req, Resp>(
        &self,
        path: &str,
        payload: &Req,
    ) -> Result<Resp, PineconeStoreError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        self.post_typed_with_context(path, payload, None).await
    }

    pub async fn post_typed_with_context<Req, Resp>(
        &self,
        path: &str,
        payload: &Req,
        namespace: Option<&str>,
    ) -> Result<Resp, PineconeStoreError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let request = self
            .authorized(self.http.post(self.url(path)))
            .header("Content-Type", "application/json")
            .json(payload);
        self.send(request, namespace).await
    }

    pub async fn get_typed<Resp>(&self, path: &str) -> Result<Resp, PineconeStoreError>
    where
        Resp: DeserializeOwned,
    {
        let request = self.authorized(self.http.get(self.url(path)));
        self.send(request, None).await
    }

    async fn send<Resp>(
        &self,
        request: RequestBuilder,
        namespace: Option<&str>,
    ) -> Result<Resp, PineconeStoreError>
    where
        Resp: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|err| PineconeStoreError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let value = response
                .json::<Resp>()
                .await
                .map_err(|err| PineconeStoreError::Malformed(err.to_string()))?;
            return Ok(value);
        }

        let retry_after_seconds = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body: Value = response
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::String(String::new()));
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| body.pointer("/error/message").and_then(Value::as_str))
            .or_else(|| body.get("error").and_then(Value::as_str))
            .unwrap_or("unknown pinecone error")
            .to_string();

        Err(PineconeStoreError::Api {
            status: status.as_u16(),
            message,
            retry_after_seconds,
            namespace: namespace.map(ToOwned::to_owned),
        })
    }
}
