//! HTTP client for communicating with the nactranslate server.

use anyhow::{Context, Result};

use crate::protocol::{
    HEALTH_PATH, HealthResponse, LANG_FROM_HEADER, LANG_TO_HEADER, LANGUAGES_PATH,
    LanguagesResponse, PROCESS_AUDIO_PATH, TextResponse,
};

/// Thin client over the server's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit one recorded utterance and return the response text.
    ///
    /// Language headers are only sent when given, letting the server apply its defaults.
    /// Non-success responses become errors carrying the server's diagnostic text.
    pub async fn process_audio(
        &self,
        audio: Vec<u8>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<String> {
        let mut request = self
            .http
            .post(self.url(PROCESS_AUDIO_PATH))
            .header("Content-Type", "application/octet-stream")
            .body(audio);
        if let Some(from) = from {
            request = request.header(LANG_FROM_HEADER, from);
        }
        if let Some(to) = to {
            request = request.header(LANG_TO_HEADER, to);
        }

        let response = request
            .send()
            .await
            .context("Failed to send audio to server")?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read server response")?;

        if !status.is_success() {
            // Pipeline errors carry a JSON diagnostic; transport errors may be plain text.
            let message = serde_json::from_str::<TextResponse>(&body)
                .map(|response| response.text)
                .unwrap_or(body);
            anyhow::bail!("Server returned {}: {}", status, message);
        }
        let body: TextResponse =
            serde_json::from_str(&body).context("Failed to decode server response")?;
        Ok(body.text)
    }

    /// Query server liveness and version.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.http
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .context("Failed to connect to server")?
            .error_for_status()
            .context("Health check failed")?
            .json()
            .await
            .context("Failed to decode health response")
    }

    /// List the languages the server recognizes and can translate.
    pub async fn languages(&self) -> Result<LanguagesResponse> {
        self.http
            .get(self.url(LANGUAGES_PATH))
            .send()
            .await
            .context("Failed to connect to server")?
            .error_for_status()
            .context("Language listing failed")?
            .json()
            .await
            .context("Failed to decode languages response")
    }
}

/// Check if a server is reachable by hitting its health endpoint.
pub async fn is_server_running(base_url: &str) -> bool {
    Client::new(base_url).health().await.is_ok()
}
