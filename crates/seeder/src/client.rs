//! HTTP clients for the embedding service and the search index.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Documents are embedded with the passage prefix; the query prefix belongs
/// to the search side.
const PASSAGE_PREFIX: &str = "passage: ";

const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
const BULK_TIMEOUT: Duration = Duration::from_secs(60);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service not healthy: {0}")]
    Unhealthy(String),
    #[error("bulk indexing reported errors")]
    BulkErrors,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
    #[allow(dead_code)]
    dims: usize,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    pub took: u64,
    pub errors: bool,
}

pub struct SeedClient {
    http: reqwest::Client,
    es_host: String,
    embedding_host: String,
}

impl SeedClient {
    pub fn new(es_host: String, embedding_host: String) -> Result<Self, SeedError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            es_host,
            embedding_host,
        })
    }

    /// Verify both collaborators answer before generating any data.
    pub async fn check_health(&self) -> Result<(), SeedError> {
        let es = self
            .http
            .get(format!("{}/_cluster/health", self.es_host))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        if !es.status().is_success() {
            return Err(SeedError::Unhealthy(format!(
                "elasticsearch returned {}",
                es.status()
            )));
        }

        let embed = self
            .http
            .get(format!("{}/health", self.embedding_host))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        if !embed.status().is_success() {
            return Err(SeedError::Unhealthy(format!(
                "embedding service returned {}",
                embed.status()
            )));
        }
        let health: HealthResponse = embed.json().await?;
        if health.status != "ok" {
            return Err(SeedError::Unhealthy(format!(
                "embedding service status '{}'",
                health.status
            )));
        }

        Ok(())
    }

    /// Embed one batch of passage texts. Order of the returned vectors
    /// matches the order of `texts`.
    pub async fn get_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SeedError> {
        let response = self
            .http
            .post(format!("{}/embed", self.embedding_host))
            .timeout(EMBED_TIMEOUT)
            .json(&serde_json::json!({"texts": texts, "prefix": PASSAGE_PREFIX}))
            .send()
            .await?
            .error_for_status()?;

        let body: EmbedResponse = response.json().await?;
        Ok(body.embeddings)
    }

    /// Post the NDJSON payload to the bulk endpoint.
    pub async fn send_bulk(&self, payload: String) -> Result<BulkResponse, SeedError> {
        let response = self
            .http
            .post(format!("{}/_bulk", self.es_host))
            .timeout(BULK_TIMEOUT)
            .header("content-type", "application/x-ndjson")
            .body(payload)
            .send()
            .await?
            .error_for_status()?;

        let body: BulkResponse = response.json().await?;
        if body.errors {
            warn!("bulk response flagged per-document errors");
            return Err(SeedError::BulkErrors);
        }
        Ok(body)
    }

    /// Document count in the target index, for post-seed verification.
    pub async fn count_documents(&self, index: &str) -> Result<u64, SeedError> {
        #[derive(Deserialize)]
        struct CountResponse {
            count: u64,
        }

        let response = self
            .http
            .get(format!("{}/{}/_count", self.es_host, index))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let body: CountResponse = response.json().await?;
        Ok(body.count)
    }
}
