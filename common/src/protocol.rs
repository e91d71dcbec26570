//! Wire types shared by the HTTP server and its clients.

use serde::{Deserialize, Serialize};

/// Endpoint accepting one complete utterance.
pub const PROCESS_AUDIO_PATH: &str = "/process_audio";
/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/health";
/// Language listing endpoint.
pub const LANGUAGES_PATH: &str = "/languages";

/// Header carrying the spoken (source) language code.
pub const LANG_FROM_HEADER: &str = "Lang-From";
/// Header carrying the requested output (target) language code.
pub const LANG_TO_HEADER: &str = "Lang-To";

/// Body of every `/process_audio` response, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Languages the server can recognize and translate between.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub recognition: Vec<String>,
    pub translation: Vec<String>,
}
