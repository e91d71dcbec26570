//! LibreTranslate-compatible HTTP translation client.
//!
//! The installed language set is fetched once when the client connects and
//! never refreshed, so the request path never queries it remotely.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Translator;
use crate::config::TranslationConfig;
use crate::language::LanguageCode;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    code: String,
}

/// Client for a LibreTranslate server.
#[derive(Debug, Clone)]
pub struct LibreTranslateClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
    installed: BTreeSet<LanguageCode>,
}

impl LibreTranslateClient {
    /// Connect to the server and record its installed languages.
    pub async fn connect(config: &TranslationConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build translation HTTP client")?;
        let base_url = config.url.trim_end_matches('/').to_string();

        let entries: Vec<LanguageEntry> = http
            .get(format!("{}/languages", base_url))
            .send()
            .await
            .with_context(|| format!("Failed to reach translation server at {}", base_url))?
            .error_for_status()
            .context("Translation server rejected language query")?
            .json()
            .await
            .context("Failed to decode translation language list")?;
        let installed = installed_from_entries(entries);

        info!(
            url = %base_url,
            languages = ?installed.iter().map(LanguageCode::as_str).collect::<Vec<_>>(),
            "Translation engine connected"
        );

        Ok(Self::with_languages(base_url, config.api_key.clone(), http, installed))
    }

    fn with_languages(
        base_url: String,
        api_key: Option<String>,
        http: Client,
        installed: BTreeSet<LanguageCode>,
    ) -> Self {
        Self {
            base_url,
            api_key,
            http,
            installed,
        }
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        self.installed.contains(from) && self.installed.contains(to)
    }
}

fn installed_from_entries(entries: Vec<LanguageEntry>) -> BTreeSet<LanguageCode> {
    entries
        .into_iter()
        .filter_map(|entry| LanguageCode::parse(&entry.code).ok())
        .collect()
}

#[async_trait]
impl Translator for LibreTranslateClient {
    async fn translate(
        &self,
        from: &LanguageCode,
        to: &LanguageCode,
        text: &str,
    ) -> Result<String> {
        if !self.supports(from, to) {
            debug!(from = %from, to = %to, "Language pair not installed, returning empty translation");
            return Ok(String::new());
        }

        let body = TranslateRequest {
            q: text,
            source: from.as_str(),
            target: to.as_str(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let response = self
            .http
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()
            .await
            .context("Failed to send translation request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!(
                "Translation server returned {}: {}",
                status,
                response.text().await.unwrap_or_default()
            );
        }

        let translated: TranslateResponse = response
            .json()
            .await
            .context("Failed to decode translation response")?;
        Ok(translated.translated_text)
    }

    fn installed_languages(&self) -> BTreeSet<LanguageCode> {
        self.installed.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(value: &str) -> LanguageCode {
        LanguageCode::parse(value).unwrap()
    }

    fn client_with(codes: &[&str]) -> LibreTranslateClient {
        LibreTranslateClient::with_languages(
            "http://127.0.0.1:9".to_string(),
            None,
            Client::new(),
            codes.iter().map(|c| code(c)).collect(),
        )
    }

    #[test]
    fn test_language_list_parsing_skips_blank_codes() {
        let entries: Vec<LanguageEntry> = serde_json::from_str(
            r#"[{"code":"en","name":"English","targets":["fr"]},{"code":" ","name":"?"},{"code":"fr","name":"French"}]"#,
        )
        .unwrap();
        let installed = installed_from_entries(entries);
        let codes: Vec<&str> = installed.iter().map(LanguageCode::as_str).collect();
        assert_eq!(codes, ["en", "fr"]);
    }

    #[test]
    fn test_request_body_shape() {
        let body = TranslateRequest {
            q: "bonjour",
            source: "fr",
            target: "en",
            format: "text",
            api_key: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"q": "bonjour", "source": "fr", "target": "en", "format": "text"})
        );
    }

    #[test]
    fn test_response_parsing() {
        let parsed: TranslateResponse =
            serde_json::from_str(r#"{"translatedText":"hello"}"#).unwrap();
        assert_eq!(parsed.translated_text, "hello");
    }

    #[tokio::test]
    async fn test_uninstalled_pair_returns_empty_without_network() {
        // Nothing listens on the discard port; an actual request would fail.
        let client = client_with(&["en", "fr"]);

        let out = client.translate(&code("fr"), &code("tl"), "kumusta").await.unwrap();
        assert_eq!(out, "");
        let out = client.translate(&code("ar"), &code("en"), "marhaba").await.unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_installed_languages_snapshot() {
        let client = client_with(&["ru", "en"]);
        let installed = client.installed_languages();
        assert!(installed.contains(&code("en")));
        assert!(installed.contains(&code("ru")));
        assert_eq!(installed.len(), 2);
    }
}
