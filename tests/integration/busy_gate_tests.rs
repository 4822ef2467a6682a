//! Busy-gate behavior under concurrent submissions.

use evalbridge::bridge::SessionEvent;
use evalbridge::models::outcome::{EvaluationOutcome, ValueKind};
use evalbridge::models::request::EvaluationRequest;
use evalbridge::SessionManager;

use super::test_helpers::{RecordingChannel, ScriptedFactory};

#[tokio::test]
async fn second_request_on_a_dispatched_session_is_rejected_busy() {
    let default_factory = ScriptedFactory::new();
    let session_factory = ScriptedFactory::new();
    let channel = RecordingChannel::new();
    let manager = SessionManager::start(&default_factory, channel.clone())
        .await
        .expect("start");
    manager
        .create_session("s", &session_factory)
        .await
        .expect("create");

    // Request A parks inside the evaluator.
    let handle_a = manager
        .submit(EvaluationRequest::for_session("hold", "s"))
        .await
        .expect("submit a")
        .expect("dispatched");

    // Request B targets the same session while A is in flight.
    let dispatched_b = manager
        .submit(EvaluationRequest::for_session("1+1", "s"))
        .await
        .expect("submit b");
    assert!(dispatched_b.is_none(), "busy requests spawn nothing");
    assert_eq!(channel.outcomes(), vec![EvaluationOutcome::Busy]);

    // A still completes with its own real outcome.
    session_factory.release();
    handle_a.await.expect("task a");

    assert_eq!(
        channel.outcomes(),
        vec![
            EvaluationOutcome::Busy,
            EvaluationOutcome::Value {
                text: "done".into(),
                hint: ValueKind::Generic,
            },
        ]
    );
}

#[tokio::test]
async fn every_extra_concurrent_request_receives_busy() {
    let default_factory = ScriptedFactory::new();
    let channel = RecordingChannel::new();
    let manager = SessionManager::start(&default_factory, channel.clone())
        .await
        .expect("start");

    let handle = manager
        .submit(EvaluationRequest::new("hold"))
        .await
        .expect("submit")
        .expect("dispatched");

    for _ in 0..8 {
        let dispatched = manager
            .submit(EvaluationRequest::new("1+1"))
            .await
            .expect("submit");
        assert!(dispatched.is_none());
    }

    default_factory.release();
    handle.await.expect("task");

    let outcomes = channel.outcomes();
    let busy_count = outcomes
        .iter()
        .filter(|o| matches!(o, EvaluationOutcome::Busy))
        .count();
    let value_count = outcomes
        .iter()
        .filter(|o| matches!(o, EvaluationOutcome::Value { .. }))
        .count();
    assert_eq!(busy_count, 8);
    assert_eq!(value_count, 1);
}

#[tokio::test]
async fn requests_against_different_sessions_run_concurrently() {
    let default_factory = ScriptedFactory::new();
    let other_factory = ScriptedFactory::new();
    let channel = RecordingChannel::new();
    let manager = SessionManager::start(&default_factory, channel.clone())
        .await
        .expect("start");
    manager
        .create_session("other", &other_factory)
        .await
        .expect("create");

    // Park the default session; "other" must still accept work.
    let held = manager
        .submit(EvaluationRequest::new("hold"))
        .await
        .expect("submit")
        .expect("dispatched");

    let side = manager
        .submit(EvaluationRequest::for_session("1+1", "other"))
        .await
        .expect("submit")
        .expect("dispatched");
    side.await.expect("side task");

    assert!(channel
        .outcomes()
        .iter()
        .any(|o| matches!(o, EvaluationOutcome::Value { text, .. } if text == "2")));

    default_factory.release();
    held.await.expect("held task");
}

#[tokio::test]
async fn busy_resets_after_every_outcome_kind() {
    let factory = ScriptedFactory::new();
    let channel = RecordingChannel::new();
    let manager = SessionManager::start(&factory, channel.clone())
        .await
        .expect("start");
    let session = manager.registry().default_session();

    for source in ["1+1", "let x = 1", "(", "raise", "defect"] {
        let handle = manager
            .submit(EvaluationRequest::new(source))
            .await
            .expect("submit")
            .expect("dispatched");
        handle.await.expect("task");
        assert!(!session.is_busy(), "busy flag leaked after {source:?}");
    }
}

#[tokio::test]
async fn busy_resets_even_when_delivery_fails() {
    let factory = ScriptedFactory::new();
    let channel = RecordingChannel::new();
    let manager = SessionManager::start(&factory, channel.clone())
        .await
        .expect("start");

    channel.fail_transport();
    let handle = manager
        .submit(EvaluationRequest::new("1+1"))
        .await
        .expect("submit")
        .expect("dispatched");
    handle.await.expect("task");

    assert!(channel.outcomes().is_empty());
    assert!(!manager.registry().default_session().is_busy());

    // The session is immediately usable once the transport recovers.
    channel.restore_transport();
    let handle = manager
        .submit(EvaluationRequest::new("1+1"))
        .await
        .expect("submit")
        .expect("dispatched");
    handle.await.expect("task");
    assert_eq!(channel.outcomes().len(), 1);
}

#[tokio::test]
async fn panicking_evaluation_frees_the_session_and_reports_unreachable() {
    let default_factory = ScriptedFactory::new();
    let session_factory = ScriptedFactory::new();
    let channel = RecordingChannel::new();
    let manager = SessionManager::start(&default_factory, channel.clone())
        .await
        .expect("start");
    manager
        .create_session("s", &session_factory)
        .await
        .expect("create");

    let handle = manager
        .submit(EvaluationRequest::for_session("panic!", "s"))
        .await
        .expect("submit")
        .expect("dispatched");
    handle.await.expect("outer task survives the inner panic");

    let session = manager.registry().lookup("s").await.expect("lookup");
    assert!(!session.is_busy());
    assert!(channel
        .events()
        .iter()
        .any(|e| matches!(e, SessionEvent::Unreachable { session } if session == "s")));

    // The session still accepts work afterwards.
    let handle = manager
        .submit(EvaluationRequest::for_session("1+1", "s"))
        .await
        .expect("submit")
        .expect("dispatched");
    handle.await.expect("task");
    assert!(channel
        .outcomes()
        .iter()
        .any(|o| matches!(o, EvaluationOutcome::Value { text, .. } if text == "2")));
}

#[tokio::test]
async fn activation_reports_the_busy_hint_of_the_new_target() {
    let default_factory = ScriptedFactory::new();
    let session_factory = ScriptedFactory::new();
    let channel = RecordingChannel::new();
    let manager = SessionManager::start(&default_factory, channel.clone())
        .await
        .expect("start");
    manager
        .create_session("s", &session_factory)
        .await
        .expect("create");

    let handle = manager
        .submit(EvaluationRequest::for_session("hold", "s"))
        .await
        .expect("submit")
        .expect("dispatched");

    assert!(manager.set_active("s").await.expect("activate"));

    session_factory.release();
    handle.await.expect("task");

    assert!(!manager.set_active("s").await.expect("activate again"));
}
