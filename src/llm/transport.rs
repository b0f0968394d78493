use std::time::Duration;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::llm::client::LlmRequest;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// One outbound provider call. No retries; a failure is final.
pub trait Transport: Send + Sync {
    fn send(&self, request: &LlmRequest) -> Result<Value>;
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &LlmRequest) -> Result<Value> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::ProviderUnavailable(e.to_string()))?;

        let mut req = client.post(request.url.clone()).json(&request.body);
        for (k, v) in &request.headers {
            req = req.header(*k, v);
        }

        let resp = req
            .send()
            .map_err(|e| Error::ProviderUnavailable(e.without_url().to_string()))?;
        let status = resp.status();

        // Provider error bodies are not interpreted
        if !status.is_success() {
            return Err(Error::ProviderUnavailable(format!("AI API error: {status}")));
        }

        resp.json()
            .map_err(|_| Error::ProviderUnavailable("response body is not JSON".into()))
    }
}
