//! Classification client.
//!
//! [`Classifier`] is the seam the view controller depends on;
//! [`GeminiClassifier`] is the HTTP implementation. One call sends exactly one
//! POST and never retries.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClassifierConfig;
use crate::decode::decode_answer;
use crate::error::{Error, ErrorContext};
use crate::image::ImagePayload;
use crate::prompt;
use crate::result::AnalysisResult;
use crate::wire::{GenerateRequest, GenerateResponse};
use crate::Result;

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &ImagePayload) -> Result<AnalysisResult>;
}

pub struct GeminiClassifier {
    client: reqwest::Client,
    endpoint: Url,
    config: ClassifierConfig,
    instruction: String,
}

impl GeminiClassifier {
    /// Fails with a configuration error when the key is missing or a placeholder.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let endpoint = Self::endpoint_url(&config)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::transport)?;

        let instruction = prompt::instruction(config.criteria.as_deref());
        Ok(Self {
            client,
            endpoint,
            config,
            instruction,
        })
    }

    /// `{base_url}/v1beta/models/{model}:generateContent?key={api_key}`
    pub fn endpoint_url(config: &ClassifierConfig) -> Result<Url> {
        let key = config.api_key()?;
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        let mut url = Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid endpoint: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_source("client"),
            )
        })?;
        url.query_pairs_mut().append_pair("key", key);
        Ok(url)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// The endpoint without its query string, for logs.
    fn redacted_endpoint(&self) -> String {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        url.to_string()
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(&self, image: &ImagePayload) -> Result<AnalysisResult> {
        let body = GenerateRequest::new(self.instruction.clone(), image, &self.config);
        info!(
            endpoint = %self.redacted_endpoint(),
            image = image.name(),
            mime_type = image.mime_type(),
            bytes = image.size(),
            "sending classification request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Error::transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "classification request rejected");
            return Err(Error::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let raw = response.text().await.map_err(Error::transport)?;
        let data: GenerateResponse = serde_json::from_str(&raw).map_err(|e| {
            warn!(error = %e, "response body is not a generateContent answer");
            Error::parse(format!("unexpected response body: {}", e), raw.as_str())
        })?;
        if data.candidate_count() == 0 {
            warn!("response carried no candidates");
            return Err(Error::NoCandidates);
        }
        let text = data.first_text().ok_or(Error::NoCandidates)?;
        debug!(answer = text, "model answer");

        let result = decode_answer(text)?;
        info!(
            category = %result.category,
            confidence = result.confidence.value(),
            "classification decoded"
        );
        Ok(result)
    }
}
