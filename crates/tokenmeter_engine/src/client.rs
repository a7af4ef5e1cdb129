use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::{CountError, EncodedAttachment, FailureKind};

/// Fixed wrapper overhead included in the endpoint's raw `input_tokens`: the
/// message/role scaffolding around a single user message costs a constant 7
/// tokens. Subtracted, floored at zero, before a count is reported. This
/// encodes an assumption about the upstream wrapping format; revisit if that
/// format changes.
pub const TOKEN_OVERHEAD: u64 = 7;

#[derive(Debug, Clone)]
pub struct CountSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for CountSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8787".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Stateless facade over the remote counting endpoint. One outbound call per
/// invocation; no retries, the debounce layer already throttles bursts.
#[async_trait::async_trait]
pub trait CountClient: Send + Sync {
    async fn count_text(&self, text: &str) -> Result<u64, CountError>;
    async fn count_attachment(&self, encoded: &EncodedAttachment) -> Result<u64, CountError>;
}

#[derive(Debug, Clone)]
pub struct HttpCountClient {
    settings: CountSettings,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    input_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl HttpCountClient {
    pub fn new(settings: CountSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, CountError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| CountError::new(FailureKind::Unknown, err.to_string()))
    }

    async fn post_count(&self, route: &str, body: serde_json::Value) -> Result<u64, CountError> {
        let client = self.build_client()?;
        let url = format!("{}{route}", self.settings.base_url.trim_end_matches('/'));

        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the endpoint's own error message when the body carries one.
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(CountError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let counted: CountResponse = response
            .json()
            .await
            .map_err(|err| CountError::new(FailureKind::Unknown, err.to_string()))?;
        Ok(counted.input_tokens.saturating_sub(TOKEN_OVERHEAD))
    }
}

#[async_trait::async_trait]
impl CountClient for HttpCountClient {
    async fn count_text(&self, text: &str) -> Result<u64, CountError> {
        self.post_count("/count", json!({ "text": text })).await
    }

    async fn count_attachment(&self, encoded: &EncodedAttachment) -> Result<u64, CountError> {
        let (route, body) = if encoded.media_type.is_pdf() {
            (
                "/count/pdf",
                json!({
                    "pdf": encoded.base64,
                    "media_type": encoded.media_type.as_mime(),
                }),
            )
        } else {
            (
                "/count/image",
                json!({
                    "image": encoded.base64,
                    "media_type": encoded.media_type.as_mime(),
                }),
            )
        };
        self.post_count(route, body).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CountError {
    // Timeouts count as network failures; the caller never retries either way.
    CountError::new(FailureKind::Network, err.to_string())
}
