use super::*;
use crate::language::LanguageCode;
use crate::recognize::ScriptedEngine;
use crate::reconcile::Hypothesis;

fn model() -> ModelId {
    ModelId::new(
        LanguageCode::parse("en").unwrap(),
        "vosk-model-small-en-us-0.15",
        "/models/vosk-model-small-en-us-0.15",
    )
}

fn run(engine: &ScriptedEngine, frames: usize) -> SessionResult {
    let mut session = RecognitionSession::open(engine, &model(), 16_000).unwrap();
    for _ in 0..frames {
        session.feed(&[0u8; 4]).unwrap();
    }
    session.close().unwrap()
}

#[test]
fn test_new_session_is_open() {
    let engine = ScriptedEngine::silent();
    let session = RecognitionSession::open(&engine, &model(), 16_000).unwrap();

    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(session.frames_fed(), 0);
    assert_eq!(session.model(), &model());
}

#[test]
fn test_first_frame_moves_to_accepting() {
    let engine = ScriptedEngine::silent();
    let mut session = RecognitionSession::open(&engine, &model(), 16_000).unwrap();

    session.feed(&[0u8; 4]).unwrap();

    assert_eq!(session.state(), SessionState::Accepting);
    assert_eq!(session.frames_fed(), 1);
}

#[test]
fn test_finals_are_accumulated() {
    let engine = ScriptedEngine::new([
        Hypothesis::partial("hel"),
        Hypothesis::final_text("hello"),
        Hypothesis::partial("wor"),
        Hypothesis::final_text(" world "),
    ]);

    let result = run(&engine, 4);

    assert_eq!(result.transcript, "hello world");
    assert!(!result.used_fallback);
}

#[test]
fn test_flush_text_appended_on_close() {
    let engine = ScriptedEngine::new([Hypothesis::final_text("good")]).with_flush("morning");

    let result = run(&engine, 2);

    assert_eq!(result.transcript, "good morning");
}

#[test]
fn test_last_partial_is_fallback() {
    let engine = ScriptedEngine::new([Hypothesis::partial("bon"), Hypothesis::partial("bonjour")]);

    let result = run(&engine, 2);

    assert_eq!(result.transcript, "bonjour");
    assert!(result.used_fallback);
}

#[test]
fn test_silence_yields_empty_result() {
    let engine = ScriptedEngine::silent();

    let result = run(&engine, 5);

    assert_eq!(result, SessionResult::default());
}

#[test]
fn test_close_without_frames_still_flushes() {
    let engine = ScriptedEngine::silent().with_flush("late words");

    let result = run(&engine, 0);

    assert_eq!(result.transcript, "late words");
}

#[test]
fn test_feed_after_close_is_invalid_state() {
    let engine = ScriptedEngine::silent();
    let mut session = RecognitionSession::open(&engine, &model(), 16_000).unwrap();
    session.close().unwrap();

    let err = session.feed(&[0u8; 2]).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidSessionState {
            operation: "feed",
            state: SessionState::Closed
        }
    ));
}

#[test]
fn test_double_close_is_invalid_state() {
    let engine = ScriptedEngine::silent();
    let mut session = RecognitionSession::open(&engine, &model(), 16_000).unwrap();
    session.close().unwrap();

    assert!(matches!(
        session.close(),
        Err(PipelineError::InvalidSessionState { operation: "close", .. })
    ));
}

#[test]
fn test_recognizer_released_on_close() {
    let engine = ScriptedEngine::silent();
    let stats = engine.stats();
    let mut session = RecognitionSession::open(&engine, &model(), 16_000).unwrap();
    session.feed(&[0u8; 2]).unwrap();

    assert_eq!(stats.released(), 0);
    session.close().unwrap();
    assert_eq!(stats.released(), 1);
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_recognizer_released_on_drop() {
    let engine = ScriptedEngine::silent();
    let stats = engine.stats();
    {
        let mut session = RecognitionSession::open(&engine, &model(), 16_000).unwrap();
        session.feed(&[0u8; 2]).unwrap();
    }
    assert_eq!(stats.opened(), 1);
    assert_eq!(stats.released(), 1);
}

#[test]
fn test_mid_stream_failure_releases_and_closes() {
    let engine = ScriptedEngine::new([Hypothesis::final_text("partial work")]).failing_at_frame(1);
    let stats = engine.stats();
    let mut session = RecognitionSession::open(&engine, &model(), 16_000).unwrap();

    session.feed(&[0u8; 2]).unwrap();
    let err = session.feed(&[0u8; 2]).unwrap_err();

    assert!(matches!(err, PipelineError::EngineFailure { .. }));
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(stats.released(), 1);
    assert!(matches!(
        session.feed(&[0u8; 2]),
        Err(PipelineError::InvalidSessionState { .. })
    ));
}

#[test]
fn test_open_failure_is_engine_failure() {
    let engine = ScriptedEngine::silent().failing_on_open();

    let result = RecognitionSession::open(&engine, &model(), 16_000);

    assert!(matches!(result, Err(PipelineError::EngineFailure { .. })));
}
