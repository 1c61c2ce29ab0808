//! CV text extraction. The file store itself is an external collaborator;
//! we only fetch the referenced document and pull text out of it. Failures
//! are the orchestrator's problem — it substitutes a placeholder and keeps
//! scoring.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait CvTextExtractor: Send + Sync {
    async fn extract(&self, cv_url: &str) -> Result<String>;
}

/// Fetches the CV over HTTP and extracts text from the PDF bytes.
#[derive(Clone)]
pub struct HttpPdfExtractor {
    client: reqwest::Client,
}

impl HttpPdfExtractor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpPdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CvTextExtractor for HttpPdfExtractor {
    async fn extract(&self, cv_url: &str) -> Result<String> {
        let response = self
            .client
            .get(cv_url)
            .send()
            .await
            .context("CV fetch failed")?
            .error_for_status()
            .context("CV fetch returned an error status")?;

        let bytes = response.bytes().await.context("CV body read failed")?;
        debug!("Fetched CV: {} bytes", bytes.len());

        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| anyhow::anyhow!("PDF text extraction failed: {e}"))?;
        Ok(text)
    }
}
