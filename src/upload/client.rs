use super::protocol::{UploadPart, UploadResponse, FILES_FIELD};
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// Network boundary of the batch manager: one call per batch.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, parts: Vec<UploadPart>) -> Result<UploadResponse, TransportError>;
}

#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(parts: Vec<UploadPart>) -> Result<Form, TransportError> {
        let mut form = Form::new();
        for part in parts {
            let file_part = Part::bytes(part.content.to_vec())
                .file_name(part.name)
                .mime_str(&part.media_type)
                .map_err(|_| TransportError::InvalidMediaType(part.media_type.clone()))?;
            form = form.part(FILES_FIELD, file_part);
        }
        Ok(form)
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, parts: Vec<UploadPart>) -> Result<UploadResponse, TransportError> {
        debug!("Posting {} file(s) to {}", parts.len(), self.endpoint);
        let form = Self::build_form(parts)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response.json::<UploadResponse>().await?)
    }
}
