//! End-to-end test for the HTTP server lifecycle.
//!
//! Builds the pipeline from a config with a scripted recognizer, serves it on
//! an ephemeral port and drives it through the shared HTTP client.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use nactranslate_common::client::{Client, is_server_running};
use nactranslate_daemon::config::Config;
use nactranslate_daemon::daemon::{build_orchestrator, serve};
use nactranslate_daemon::language::LanguageCode;
use nactranslate_daemon::recognize::ScriptedEngine;
use nactranslate_daemon::reconcile::Hypothesis;
use nactranslate_daemon::server::AppState;
use nactranslate_daemon::translate::Translator;

/// Reverses words so translations are recognisable in assertions.
struct ReversingTranslator;

#[async_trait]
impl Translator for ReversingTranslator {
    async fn translate(
        &self,
        from: &LanguageCode,
        to: &LanguageCode,
        text: &str,
    ) -> anyhow::Result<String> {
        if from.as_str() != "en" || to.as_str() != "ru" {
            return Ok(String::new());
        }
        Ok(text.split_whitespace().rev().collect::<Vec<_>>().join(" "))
    }

    fn installed_languages(&self) -> BTreeSet<LanguageCode> {
        ["en", "ru"]
            .into_iter()
            .map(|c| LanguageCode::parse(c).unwrap())
            .collect()
    }
}

#[tokio::test]
async fn test_server_http_lifecycle() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.models.dir = Some(tmp.path().to_path_buf());
    config.models.languages = [("en", "model-en"), ("de", "model-de")]
        .into_iter()
        .map(|(c, n)| (c.to_string(), n.to_string()))
        .collect();
    config.audio.frame_size = 4;

    let engine = ScriptedEngine::new([
        Hypothesis::partial("hello"),
        Hypothesis::final_text("hello world"),
    ]);
    let stats = engine.stats();
    let orchestrator = build_orchestrator(&config, Arc::new(engine), Arc::new(ReversingTranslator))
        .await
        .unwrap();
    let state = AppState::new(orchestrator, &config).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, state, async {
        let _ = shutdown_rx.await;
    }));

    assert!(is_server_running(&url).await, "server should answer /health");
    let client = Client::new(&url);

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");

    let languages = client.languages().await.unwrap();
    assert_eq!(languages.recognition, ["de", "en"]);
    assert_eq!(languages.translation, ["en", "ru"]);

    // Two frames: one partial, one final.
    let text = client
        .process_audio(vec![0u8; 8], Some("en"), Some("ru"))
        .await
        .unwrap();
    assert_eq!(text, "world hello");

    let text = client
        .process_audio(vec![0u8; 8], Some("en"), Some("en"))
        .await
        .unwrap();
    assert_eq!(text, "hello world");

    // Language without a translation pair yields empty text, not an error.
    let text = client
        .process_audio(vec![0u8; 8], Some("de"), Some("ru"))
        .await
        .unwrap();
    assert_eq!(text, "");

    let err = client
        .process_audio(vec![0u8; 8], Some("xx"), Some("en"))
        .await
        .unwrap_err();
    assert!(
        err.to_string().contains("Unsupported language model"),
        "unexpected error: {err}"
    );

    assert_eq!(stats.opened(), 3);
    assert_eq!(stats.released(), 3);

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
    assert!(!is_server_running(&url).await);
}
