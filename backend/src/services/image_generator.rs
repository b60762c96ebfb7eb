//! Client for the external try-on image generator.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No endpoint or credential configured; callers fall back to degraded mode.
    #[error("image generator is not configured")]
    NotConfigured,
    #[error("image generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("image generator request failed: {0}")]
    Upstream(String),
    #[error("image generator i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Composites a garment onto a subject photo.
///
/// Implementations write the result to `output` and return that path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        subject: &Path,
        garment: &Path,
        output: &Path,
    ) -> Result<PathBuf, GenerationError>;
}

#[derive(Debug, Clone)]
struct Endpoint {
    url: String,
    api_key: String,
}

/// Posts both images as multipart form fields `subject` and `garment` with the
/// API key as a bearer credential; the response body is the composited image.
#[derive(Debug, Clone)]
pub struct HttpImageGenerator {
    client: Client,
    endpoint: Option<Endpoint>,
    timeout: Duration,
}

impl HttpImageGenerator {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("tryon-backend/1.0")
            .build()?;
        let endpoint = match (&config.ai_api_url, &config.ai_api_key) {
            (Some(url), Some(api_key)) => Some(Endpoint {
                url: url.clone(),
                api_key: api_key.clone(),
            }),
            _ => None,
        };
        Ok(Self {
            client,
            endpoint,
            timeout: Duration::from_secs(config.ai_timeout_seconds),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn call(
        &self,
        endpoint: &Endpoint,
        subject: &Path,
        garment: &Path,
    ) -> Result<Vec<u8>, GenerationError> {
        let subject_bytes = tokio::fs::read(subject).await?;
        let garment_bytes = tokio::fs::read(garment).await?;
        let form = Form::new()
            .part("subject", Part::bytes(subject_bytes).file_name(file_name(subject)))
            .part("garment", Part::bytes(garment_bytes).file_name(file_name(garment)));

        let response = self
            .client
            .post(&endpoint.url)
            .bearer_auth(&endpoint.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Upstream(format!("status {}", status)));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;
        if body.is_empty() {
            return Err(GenerationError::Upstream("empty response body".into()));
        }
        Ok(body.to_vec())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(
        &self,
        subject: &Path,
        garment: &Path,
        output: &Path,
    ) -> Result<PathBuf, GenerationError> {
        let endpoint = self.endpoint.as_ref().ok_or(GenerationError::NotConfigured)?;

        let image = tokio::time::timeout(self.timeout, self.call(endpoint, subject, garment))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, &image).await?;
        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;

    fn config(url: Option<&str>, key: Option<&str>) -> Config {
        Config {
            database_url: String::new(),
            storage_backend: StorageBackend::Memory,
            jwt_secret: "s".into(),
            upload_dir: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:3000".into(),
            ai_api_url: url.map(str::to_string),
            ai_api_key: key.map(str::to_string),
            ai_timeout_seconds: 5,
            photo_cleanup_interval_seconds: 0,
            owner_email: None,
            owner_password: None,
            cors_allow_origins: vec!["*".into()],
            max_upload_bytes: 1024,
        }
    }

    #[tokio::test]
    async fn missing_credential_is_not_configured() {
        let generator = HttpImageGenerator::from_config(&config(Some("http://ai"), None)).unwrap();
        assert!(!generator.is_configured());
        let err = generator
            .generate(Path::new("a.jpg"), Path::new("b.png"), Path::new("out.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured));
    }

    #[tokio::test]
    async fn unreadable_inputs_surface_as_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let generator =
            HttpImageGenerator::from_config(&config(Some("http://127.0.0.1:9"), Some("k"))).unwrap();
        assert!(generator.is_configured());
        let err = generator
            .generate(
                &dir.path().join("missing.jpg"),
                &dir.path().join("missing.png"),
                &dir.path().join("out.png"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Io(_)));
    }
}
