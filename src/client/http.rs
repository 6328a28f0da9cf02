use super::GenerationService;
use crate::models::{
    Config, GenerateRequest, GenerationResponse, HealthStatus, HistoryEntry,
    DEFAULT_API_BASE_URL, GENERATE_PATH, HEALTH_PATH, HISTORY_PATH,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub struct HttpGenerationClient {
    client: Client,
    base_url: String,
}

impl HttpGenerationClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new_with_client(client))
    }

    /// Reuse an existing connection pool.
    pub fn new_with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.timeout)?.with_base_url(config.api_base_url.clone()))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to generation backend: {}", e);
                e
            })?;

        Self::decode(response).await
    }

    async fn get<Resp: DeserializeOwned>(&self, path: &str) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to reach generation backend: {}", e);
            e
        })?;

        Self::decode(response).await
    }

    async fn decode<Resp: DeserializeOwned>(response: Response) -> Result<Resp> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            tracing::error!("Generation backend error (status {}): {}", status, body);
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse backend response: {}\nBody: {}", e, body);
            Error::Serialization(e)
        })
    }
}

#[async_trait]
impl GenerationService for HttpGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse> {
        let response: GenerationResponse = self
            .post(GENERATE_PATH, &GenerateRequest::new(prompt))
            .await?;

        if response == GenerationResponse::Unrecognized {
            tracing::warn!("Generation response carried no recognizable image reference");
        }

        Ok(response)
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.get(HISTORY_PATH).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.get(HEALTH_PATH).await
    }
}
