mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MockGenerator, is_opening, is_summary};
use harmony_application::{ChartStep, SessionUseCase};
use harmony_core::blobs::ShapeId;
use harmony_core::config::HarmonyConfig;
use harmony_core::conversation::OPENING_FAILED_TEXT;
use harmony_core::error::HarmonyError;
use harmony_core::generation::GenerationError;
use harmony_core::interaction::{PointerEvent, PointerOutcome};
use harmony_core::journal::{JournalRecord, JournalStore};
use harmony_core::prompt::GapCategory;
use harmony_core::session::Scene;
use harmony_infrastructure::InMemoryJournalStore;
use tokio::sync::Semaphore;

fn session(generator: Arc<MockGenerator>, store: Arc<InMemoryJournalStore>) -> SessionUseCase {
    SessionUseCase::new(
        HarmonyConfig::default(),
        store as Arc<dyn JournalStore>,
        generator,
    )
}

async fn press(session: &SessionUseCase, id: ShapeId) -> PointerOutcome {
    let center = session.state().await.blobs().shape(id).center;
    let outcome = session
        .pointer(PointerEvent::Down {
            x: center.x,
            y: center.y,
        })
        .await;
    session.pointer(PointerEvent::Up).await;
    outcome
}

/// Starts the session and presses a shape three times.
async fn through_blobs(session: &SessionUseCase) {
    session.start("Ada").await.unwrap();
    for _ in 0..3 {
        press(session, ShapeId::SelfConcept).await;
    }
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let store = Arc::new(InMemoryJournalStore::new());
    let session = session(Arc::new(MockGenerator::scripted("Q", "R", "S")), store.clone());

    let err = session.start("  ").await.unwrap_err();
    assert!(matches!(err, HarmonyError::MissingIdentity));
    assert_eq!(session.scene(), Scene::Start);
    assert!(store.entries().await.is_empty());
}

#[tokio::test]
async fn test_start_twice_records_identity_once() {
    let store = Arc::new(InMemoryJournalStore::new());
    let session = session(Arc::new(MockGenerator::scripted("Q", "R", "S")), store.clone());

    session.start(" Ada ").await.unwrap();
    session.start("Grace").await.unwrap();

    assert_eq!(session.scene(), Scene::Blobs);
    assert_eq!(
        store.entries().await,
        vec![JournalRecord::user_identity("Ada")]
    );
    session.shutdown().await;
}

#[tokio::test]
async fn test_dragging_a_shape_publishes_intensity() {
    let session = session(
        Arc::new(MockGenerator::scripted("Q", "R", "S")),
        Arc::new(InMemoryJournalStore::new()),
    );
    session.start("Ada").await.unwrap();
    let intensity = session.intensity();

    let state = session.state().await;
    let target = state.blobs().shape(ShapeId::SelfConcept).center;
    let from = state.blobs().shape(ShapeId::Presented).center;
    session
        .pointer(PointerEvent::Down { x: from.x, y: from.y })
        .await;
    let outcome = session
        .pointer(PointerEvent::Move {
            x: target.x,
            y: target.y,
        })
        .await;

    assert_eq!(
        outcome,
        PointerOutcome::ShapeMoved {
            id: ShapeId::Presented,
            intensity: 1.0
        }
    );
    assert_eq!(*intensity.borrow(), 1.0);
    session.shutdown().await;
}

#[tokio::test]
async fn test_finish_blobs_requires_three_presses() {
    let store = Arc::new(InMemoryJournalStore::new());
    let session = session(Arc::new(MockGenerator::scripted("Q", "R", "S")), store.clone());
    session.start("Ada").await.unwrap();

    press(&session, ShapeId::Presented).await;
    assert!(matches!(
        session.finish_blobs().await,
        Err(HarmonyError::InvalidTransition { .. })
    ));
    assert_eq!(store.entries().await.len(), 1);
    session.shutdown().await;
}

#[tokio::test]
async fn test_full_session_with_low_congruence() {
    let generator = Arc::new(MockGenerator::scripted(
        "Where did you wear the mask?",
        "What did that cost you?",
        "User wore a mask at work.",
    ));
    let store = Arc::new(InMemoryJournalStore::new());
    let session = session(generator.clone(), store.clone());

    through_blobs(&session).await;
    // Default placement keeps the shapes apart.
    let congruence = session.finish_blobs().await.unwrap();
    assert_eq!(congruence, 0);
    assert_eq!(session.scene(), Scene::Chart);

    assert_eq!(
        session.advance_chart().await.unwrap(),
        ChartStep::EnteredIdeal
    );
    let step = session.advance_chart().await.unwrap();
    let ChartStep::Reflecting { selection, opening } = step else {
        panic!("expected the reflection scene");
    };
    assert_eq!(selection.category, GapCategory::Congruence);
    assert_eq!(opening.as_deref(), Some("Where did you wear the mask?"));
    assert_eq!(session.scene(), Scene::Reflection);

    let opening_request = generator
        .requests()
        .into_iter()
        .find(|r| is_opening(r))
        .unwrap();
    assert!(opening_request.system_prompt.contains("History: New Patient"));
    assert!(
        opening_request
            .system_prompt
            .contains("you felt you had to wear a mask today")
    );

    let reply = session.send_message("At lunch.").await.unwrap().unwrap();
    assert_eq!(reply.text, "What did that cost you?");
    assert!(reply.summary_refresh_started);
    session.shutdown().await;
    assert_eq!(
        session.summary().await.as_deref(),
        Some("User wore a mask at work.")
    );
    assert_eq!(generator.count(is_summary), 1);

    let entries = store.entries().await;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], JournalRecord::user_identity("Ada"));
    assert_eq!(entries[1], JournalRecord::congruence(0));
    match &entries[2] {
        JournalRecord::SelfArchitecture {
            metrics,
            ideal_metrics,
            ..
        } => {
            assert_eq!(metrics.len(), 7);
            assert_eq!(metrics, ideal_metrics);
        }
        other => panic!("unexpected record {other:?}"),
    }
    assert_eq!(store.summary().await.as_deref(), Some("User wore a mask at work."));

    let metrics = session.metric_list().await;
    assert_eq!(metrics[0].meta(), "Current: 5 / Ideal: 5");
    assert!(session.advance_chart().await.is_err());
}

#[tokio::test]
async fn test_chart_gap_selects_depressive_opener_with_history() {
    let generator = Arc::new(MockGenerator::scripted("What is one bridge?", "R", "S"));
    let store = Arc::new(InMemoryJournalStore::with_summary("Prefers short sessions."));
    let session = session(generator.clone(), store);

    session.start("Ada").await.unwrap();
    // Overlap the shapes fully before the presses.
    let state = session.state().await;
    let target = state.blobs().shape(ShapeId::SelfConcept).center;
    let from = state.blobs().shape(ShapeId::Presented).center;
    session
        .pointer(PointerEvent::Down { x: from.x, y: from.y })
        .await;
    session
        .pointer(PointerEvent::Move {
            x: target.x,
            y: target.y,
        })
        .await;
    session.pointer(PointerEvent::Up).await;
    press(&session, ShapeId::Presented).await;
    press(&session, ShapeId::Presented).await;

    assert_eq!(session.finish_blobs().await.unwrap(), 100);

    session.set_chart_score(2, 3).await.unwrap();
    session.advance_chart().await.unwrap();
    session.set_chart_score(2, 9).await.unwrap();
    let ChartStep::Reflecting { selection, .. } = session.advance_chart().await.unwrap() else {
        panic!("expected the reflection scene");
    };

    assert_eq!(selection.category, GapCategory::Depressive);
    assert_eq!(
        selection.data_context(),
        "Metric: Self-esteem, Actual: 3, Ideal: 9"
    );
    let opening_request = &generator.requests()[0];
    assert!(opening_request.system_prompt.contains("History: Prefers short sessions."));
    assert!(
        opening_request
            .system_prompt
            .contains("regarding your Self-esteem")
    );
    assert_eq!(session.summary().await.as_deref(), Some("Prefers short sessions."));

    session.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_waits_for_slow_summary() {
    let permits = Arc::new(Semaphore::new(0));
    let generator = Arc::new(
        MockGenerator::scripted("Q?", "R.", "NEW SUMMARY").with_gate(is_summary, permits.clone()),
    );
    let store = Arc::new(InMemoryJournalStore::with_summary("old"));
    let session = session(generator.clone(), store.clone());

    through_blobs(&session).await;
    session.finish_blobs().await.unwrap();
    session.advance_chart().await.unwrap();
    session.advance_chart().await.unwrap();

    // The reply is dropped; nothing but the session holds the refresh.
    session.send_message("hello").await.unwrap().unwrap();

    let release = {
        let generator = generator.clone();
        tokio::spawn(async move {
            generator.wait_for(is_summary, 1).await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            permits.add_permits(1);
        })
    };

    session.shutdown().await;
    release.await.unwrap();
    assert_eq!(store.summary().await.as_deref(), Some("NEW SUMMARY"));
}

#[tokio::test]
async fn test_failed_opening_still_enters_reflection() {
    let generator = Arc::new(MockGenerator::new(|_| {
        Err(GenerationError::Transport("connection refused".into()))
    }));
    let session = session(generator, Arc::new(InMemoryJournalStore::new()));

    through_blobs(&session).await;
    session.finish_blobs().await.unwrap();
    session.advance_chart().await.unwrap();
    let ChartStep::Reflecting { opening, .. } = session.advance_chart().await.unwrap() else {
        panic!("expected the reflection scene");
    };

    assert!(opening.is_none());
    assert_eq!(session.scene(), Scene::Reflection);
    let view = session.chat_view().await.unwrap();
    assert_eq!(view.status_line(), Some(OPENING_FAILED_TEXT));
    assert!(session.send_message("hello").await.is_err());

    session.shutdown().await;
}

#[tokio::test]
async fn test_messages_outside_reflection_are_rejected() {
    let session = session(
        Arc::new(MockGenerator::scripted("Q", "R", "S")),
        Arc::new(InMemoryJournalStore::new()),
    );
    assert!(session.chat_view().await.is_none());
    assert!(matches!(
        session.send_message("hello").await,
        Err(HarmonyError::InvalidTransition { .. })
    ));

    through_blobs(&session).await;
    assert!(matches!(
        session.send_message("hello").await,
        Err(HarmonyError::InvalidTransition { .. })
    ));
    session.shutdown().await;
}

#[tokio::test]
async fn test_chart_frames_are_published_while_plotting() {
    let session = session(
        Arc::new(MockGenerator::scripted("Q", "R", "S")),
        Arc::new(InMemoryJournalStore::new()),
    );
    let mut frames = session.frames();

    through_blobs(&session).await;
    session.finish_blobs().await.unwrap();
    frames.changed().await.unwrap();
    {
        let frame = frames.borrow_and_update();
        let frame = frame.as_ref().unwrap();
        assert_eq!(frame.polygons.len(), 1);
        assert_eq!(frame.nodes.len(), 7);
    }

    session.shutdown().await;
    assert_eq!(session.scene(), Scene::Chart);
}
