//! Server runner: builds the pipeline from configuration and serves HTTP.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::models;
use crate::orchestrator::{AudioSettings, Orchestrator};
use crate::recognize::RecognitionEngine;
use crate::resolver::LanguageResolver;
use crate::server::{AppState, create_router};
use crate::translate::{LibreTranslateClient, Translator};

/// Run the server until SIGINT/SIGTERM.
pub async fn run_with_config(config: Config) -> Result<()> {
    let engine = recognition_engine()?;
    let translator = LibreTranslateClient::connect(&config.translation)
        .await
        .context("Failed to connect to translation engine")?;
    let orchestrator = build_orchestrator(&config, engine, Arc::new(translator)).await?;
    let state = AppState::new(orchestrator, &config)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    serve(listener, state, shutdown_signal()).await
}

/// Assemble the pipeline from configuration and the given engines.
///
/// Also audits the configured model directories; missing models are logged
/// but do not prevent startup.
pub async fn build_orchestrator(
    config: &Config,
    engine: Arc<dyn RecognitionEngine>,
    translator: Arc<dyn Translator>,
) -> Result<Orchestrator> {
    config.validate()?;
    let models_dir = config.models_dir()?;
    let resolver = LanguageResolver::new(&models_dir, &config.models.languages)
        .context("Invalid models.languages table")?;
    info!(
        models_dir = %models_dir.display(),
        languages = resolver.len(),
        "Language models configured"
    );
    models::log_audit(&resolver).await;

    let audio = AudioSettings {
        sample_rate: config.audio.sample_rate,
        frame_size: config.audio.frame_size()?,
    };
    Ok(Orchestrator::new(resolver, engine, translator, audio))
}

/// Serve HTTP on `listener` until `shutdown` completes.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

#[cfg(feature = "vosk")]
fn recognition_engine() -> Result<Arc<dyn RecognitionEngine>> {
    Ok(Arc::new(crate::recognize::VoskEngine::new()))
}

#[cfg(not(feature = "vosk"))]
fn recognition_engine() -> Result<Arc<dyn RecognitionEngine>> {
    anyhow::bail!("nacd was built without a speech recognition backend; rebuild with `--features vosk`")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}
