use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use sha2::Sha256;

use crate::core::{AppError, Result};
use crate::modules::notifications::models::EventEnvelope;
use crate::modules::notifications::services::EventSink;

type HmacSha256 = Hmac<Sha256>;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts signed JSON events to the finance inbox webhook
pub struct WebhookSink {
    client: ClientWithMiddleware,
    url: String,
    secret: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build webhook client: {}", e)))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            url: url.into(),
            secret: secret.into(),
        })
    }

    /// Hex HMAC-SHA256 of the raw body
    pub fn sign(secret: &str, body: &[u8]) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::internal(format!("Invalid webhook secret: {}", e)))?;
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl EventSink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn deliver(&self, envelope: &EventEnvelope) -> Result<()> {
        let body = serde_json::to_vec(envelope)?;
        let signature = Self::sign(&self.secret, &body)?;

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("X-Signature", signature)
            .header("X-Event-Id", envelope.id.as_str())
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::internal(format!(
                "Webhook returned {} for event {}",
                status, envelope.id
            )));
        }

        tracing::debug!(event_id = %envelope.id, status = %status, "Webhook delivered");
        Ok(())
    }
}
