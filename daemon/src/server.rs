//! HTTP transport for the transcribe-and-translate operation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use nactranslate_common::protocol::{
    HEALTH_PATH, HealthResponse, LANG_FROM_HEADER, LANG_TO_HEADER, LANGUAGES_PATH,
    LanguagesResponse, PROCESS_AUDIO_PATH, TextResponse,
};
use tokio::sync::Semaphore;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::PipelineError;
use crate::frames::AudioPayload;
use crate::language::{LanguageCode, LanguagePair};
use crate::orchestrator::Orchestrator;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Orchestrator,
    default_from: LanguageCode,
    default_to: Option<LanguageCode>,
    slots: Arc<Semaphore>,
    request_timeout: Option<Duration>,
    max_body_bytes: usize,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, config: &Config) -> anyhow::Result<Self> {
        let default_from = LanguageCode::parse(&config.request.default_from)
            .context("Invalid request.default_from")?;
        let default_to = config
            .request
            .default_to
            .as_deref()
            .map(LanguageCode::parse)
            .transpose()
            .context("Invalid request.default_to")?;

        Ok(Self {
            orchestrator,
            default_from,
            default_to,
            slots: Arc::new(Semaphore::new(config.server.max_concurrent_requests)),
            request_timeout: config.server.request_timeout_secs.map(Duration::from_secs),
            max_body_bytes: config.server.max_body_bytes,
        })
    }

    /// Language pair from the request headers, with configured defaults.
    ///
    /// A missing `Lang-To` means "no translation" unless a default target is set.
    fn language_pair(&self, headers: &HeaderMap) -> Result<LanguagePair, PipelineError> {
        let from = match header_code(headers, LANG_FROM_HEADER)? {
            Some(code) => code,
            None => self.default_from.clone(),
        };
        let to = match header_code(headers, LANG_TO_HEADER)? {
            Some(code) => code,
            None => self.default_to.clone().unwrap_or_else(|| from.clone()),
        };
        Ok(LanguagePair::new(from, to))
    }
}

fn header_code(headers: &HeaderMap, name: &str) -> Result<Option<LanguageCode>, PipelineError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| PipelineError::InvalidLanguageCode {
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        })?;
    LanguageCode::parse(value).map(Some)
}

/// Create the HTTP router.
pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.max_body_bytes;
    Router::new()
        .route(PROCESS_AUDIO_PATH, post(process_audio))
        .route(HEALTH_PATH, get(health))
        .route(LANGUAGES_PATH, get(languages))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn process_audio(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TextResponse>, ApiError> {
    let pair = state.language_pair(&headers)?;
    info!(bytes = body.len(), pair = %pair, "Processing audio");

    let work = async {
        // The permit follows recognition onto the blocking pool, so an
        // abandoned request keeps its slot until its recognizer is released.
        let slot = state
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ApiError::internal())?;
        let payload = AudioPayload::new(body.to_vec());
        let text = state
            .orchestrator
            .process_holding(payload, &pair, slot)
            .await?;
        Ok::<_, ApiError>(text)
    };

    let text = match state.request_timeout {
        Some(limit) => tokio::time::timeout(limit, work).await.map_err(|_| {
            warn!(pair = %pair, limit_secs = limit.as_secs(), "Request timed out");
            ApiError::timeout()
        })??,
        None => work.await?,
    };

    Ok(Json(TextResponse { text }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    let recognition = state
        .orchestrator
        .resolver()
        .languages()
        .map(ToString::to_string)
        .collect();
    let translation = state
        .orchestrator
        .dispatcher()
        .translator()
        .installed_languages()
        .into_iter()
        .map(String::from)
        .collect();
    Json(LanguagesResponse {
        recognition,
        translation,
    })
}

/// Structured error response; the body never carries raw engine output.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Error: Internal error",
        }
    }

    fn timeout() -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: "Error: Processing timed out",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(TextResponse {
            text: self.message.to_string(),
        });
        (self.status, body).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::UnsupportedLanguage { code } => {
                warn!(code = %code, "Unsupported source language");
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: "Error: Unsupported language model",
                }
            }
            PipelineError::InvalidLanguageCode { .. } => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: "Error: Invalid language code",
            },
            PipelineError::InvalidSessionState { .. } => {
                error!(error = %err, "Session state machine violated");
                ApiError::internal()
            }
            PipelineError::EngineFailure { .. } => {
                error!(error = %err, "Engine failure");
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Error: Processing failed",
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
