//! Session use case: sequences Start → Blobs → Chart → Reflection.
//!
//! `SessionUseCase` owns the one [`SessionState`] of a run, persists the
//! journal records at each transition and starts or stops the scene-scoped
//! background tasks.
//!
//! # Thread Safety
//!
//! State lives behind a `tokio::sync::Mutex`; background tasks only read it.
//! Every task holds a child of the session's cancellation token so
//! [`SessionUseCase::shutdown`] stops them all, after letting a pending
//! summary refresh finish.

use std::sync::Arc;
use std::time::Duration;

use harmony_core::audio::AudioSink;
use harmony_core::chart::{ChartAdvance, ChartFrame, MetricListItem, entry_date_label};
use harmony_core::config::HarmonyConfig;
use harmony_core::conversation::ChatView;
use harmony_core::error::{HarmonyError, Result};
use harmony_core::generation::TextGenerator;
use harmony_core::interaction::{PointerEvent, PointerOutcome};
use harmony_core::journal::{JournalRecord, JournalStore};
use harmony_core::prompt::{PromptSelection, select_prompt};
use harmony_core::session::{Scene, SessionState};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::ambient::spawn_ambient_loop;
use crate::conversation::{ConversationController, Reply};
use crate::frame_loop::spawn_frame_loop;

/// Result of pressing the chart's action button.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartStep {
    /// Ideal plotting began.
    EnteredIdeal,
    /// The entry is complete and the reflection scene is up.
    Reflecting {
        selection: PromptSelection,
        /// The opening question, or `None` when generation failed.
        opening: Option<String>,
    },
}

/// Tokens for the background work of each scene.
struct SceneTokens {
    root: CancellationToken,
    blobs: CancellationToken,
    chart: CancellationToken,
    reflection: CancellationToken,
}

impl SceneTokens {
    fn new() -> Self {
        let root = CancellationToken::new();
        Self {
            blobs: root.child_token(),
            chart: root.child_token(),
            reflection: root.child_token(),
            root,
        }
    }
}

pub struct SessionUseCase {
    id: Uuid,
    config: HarmonyConfig,
    state: Arc<Mutex<SessionState>>,
    store: Arc<dyn JournalStore>,
    generator: Arc<dyn TextGenerator>,
    audio: Option<Arc<dyn AudioSink>>,
    intensity_tx: watch::Sender<f64>,
    scene_tx: watch::Sender<Scene>,
    frame_tx: watch::Sender<Option<ChartFrame>>,
    tokens: SceneTokens,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    conversation: Mutex<Option<Arc<ConversationController>>>,
}

impl SessionUseCase {
    pub fn new(
        config: HarmonyConfig,
        store: Arc<dyn JournalStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let state = SessionState::new(&config.scene, &config.chart);
        Self {
            id: Uuid::new_v4(),
            config,
            state: Arc::new(Mutex::new(state)),
            store,
            generator,
            audio: None,
            intensity_tx: watch::Sender::new(0.0),
            scene_tx: watch::Sender::new(Scene::Start),
            frame_tx: watch::Sender::new(None),
            tokens: SceneTokens::new(),
            tasks: Mutex::new(Vec::new()),
            conversation: Mutex::new(None),
        }
    }

    /// Routes ambient tones to `sink`.
    pub fn with_audio_sink(mut self, sink: Arc<dyn AudioSink>) -> Self {
        self.audio = Some(sink);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scene(&self) -> Scene {
        *self.scene_tx.borrow()
    }

    /// Latest overlap intensity, updated on every shape move.
    pub fn intensity(&self) -> watch::Receiver<f64> {
        self.intensity_tx.subscribe()
    }

    /// Chart frames published by the frame loop, for drawing front-ends and
    /// the REPL's chart listing.
    pub fn frames(&self) -> watch::Receiver<Option<ChartFrame>> {
        self.frame_tx.subscribe()
    }

    /// A copy of the current state, for rendering.
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Long-form date shown on the chart screen.
    pub fn entry_date(&self) -> String {
        entry_date_label(chrono::Local::now().date_naive())
    }

    pub async fn metric_list(&self) -> Vec<MetricListItem> {
        self.state.lock().await.chart_snapshot().metric_list()
    }

    pub async fn chat_view(&self) -> Option<ChatView> {
        match self.controller().await {
            Some(controller) => Some(controller.chat_view().await),
            None => None,
        }
    }

    pub async fn summary(&self) -> Option<String> {
        match self.controller().await {
            Some(controller) => controller.summary().await,
            None => None,
        }
    }

    /// Starts the session for `name`.
    ///
    /// A blank name is rejected with [`HarmonyError::MissingIdentity`];
    /// starting an already started session does nothing.
    pub async fn start(&self, name: &str) -> Result<()> {
        let started = self.state.lock().await.begin(name)?;
        if !started {
            tracing::debug!("[Session] start ignored, session {} already running", self.id);
            return Ok(());
        }

        self.persist(JournalRecord::user_identity(name.trim())).await;
        self.enter(Scene::Blobs);

        let handle = spawn_ambient_loop(
            self.intensity_tx.subscribe(),
            self.scene_tx.subscribe(),
            self.audio.clone(),
            Duration::from_millis(self.config.ambient.interval_ms),
            self.tokens.blobs.clone(),
        );
        self.tasks.lock().await.push(handle);
        Ok(())
    }

    /// Feeds one pointer event to the active scene.
    pub async fn pointer(&self, event: PointerEvent) -> PointerOutcome {
        let outcome = self.state.lock().await.handle_pointer(event);
        if let PointerOutcome::ShapeMoved { intensity, .. } = outcome {
            self.intensity_tx.send_replace(intensity);
        }
        outcome
    }

    /// Leaves the blob scene once the next affordance is showing.
    ///
    /// Returns the recorded congruence percentage.
    pub async fn finish_blobs(&self) -> Result<u8> {
        let congruence = self.state.lock().await.finish_blobs()?;
        self.tokens.blobs.cancel();

        self.persist(JournalRecord::congruence(congruence)).await;
        self.enter(Scene::Chart);

        let handle = spawn_frame_loop(
            self.state.clone(),
            self.frame_tx.clone(),
            Duration::from_millis(self.config.chart.frame_interval_ms),
            self.tokens.chart.clone(),
        );
        self.tasks.lock().await.push(handle);
        Ok(congruence)
    }

    /// Sets axis `index` of the overlay being plotted to `score` (1–10).
    pub async fn set_chart_score(&self, index: usize, score: u8) -> Result<f64> {
        self.state
            .lock()
            .await
            .set_chart_value(index, f64::from(score) / 10.0)
    }

    /// Presses the chart's action button.
    ///
    /// Completing the chart persists both overlays, enters the reflection
    /// scene and asks for the opening question.
    pub async fn advance_chart(&self) -> Result<ChartStep> {
        let (advance, congruence) = {
            let mut state = self.state.lock().await;
            let advance = state.advance_chart()?;
            (advance, state.congruence())
        };

        let snapshot = match advance {
            ChartAdvance::EnteredIdeal => {
                tracing::info!("[Session] Plotting ideal self");
                return Ok(ChartStep::EnteredIdeal);
            }
            ChartAdvance::Completed(snapshot) => snapshot,
        };

        self.persist(JournalRecord::self_architecture(&snapshot)).await;
        self.tokens.chart.cancel();
        self.enter(Scene::Reflection);

        let summary = match self.store.fetch_summary().await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("[Session] Could not fetch summary: {}", e);
                None
            }
        };

        let selection = select_prompt(congruence, &snapshot.readings());
        tracing::info!(
            "[Session] Opener category {} ({})",
            selection.category,
            selection.data_context()
        );

        let controller = Arc::new(ConversationController::new(
            self.generator.clone(),
            self.store.clone(),
            self.config.generation.max_tokens,
            self.tokens.reflection.clone(),
        ));
        *self.conversation.lock().await = Some(controller.clone());

        let opening = match controller.open(&selection, summary).await {
            Ok(question) => Some(question),
            Err(e @ HarmonyError::Cancelled(_)) => return Err(e),
            Err(_) => None,
        };

        Ok(ChartStep::Reflecting { selection, opening })
    }

    /// Sends a chat message in the reflection scene.
    pub async fn send_message(&self, text: &str) -> Result<Option<Reply>> {
        let scene = self.scene();
        if scene != Scene::Reflection {
            return Err(HarmonyError::invalid_transition("send a message", scene));
        }
        let controller = self
            .controller()
            .await
            .ok_or_else(|| HarmonyError::internal("reflection scene without a conversation"))?;
        controller.submit(text).await
    }

    /// Cancels every background task and waits for them to stop.
    ///
    /// A summary refresh already under way gets up to one generation
    /// timeout to land before the cancel.
    pub async fn shutdown(&self) {
        if let Some(controller) = self.controller().await {
            let limit = Duration::from_secs(self.config.generation.timeout_secs);
            if tokio::time::timeout(limit, controller.flush_summary()).await.is_err() {
                tracing::warn!(
                    "[Session] Summary refresh still running after {:?}, dropping it",
                    limit
                );
            }
        }
        self.tokens.root.cancel();
        let tasks: Vec<_> = self.tasks.lock().await.drain(..).collect();
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!("[Session] Background task ended abnormally: {}", e);
            }
        }
        tracing::info!("[Session] Session {} shut down", self.id);
    }

    async fn controller(&self) -> Option<Arc<ConversationController>> {
        self.conversation.lock().await.clone()
    }

    async fn persist(&self, record: JournalRecord) {
        let kind = record.kind();
        if let Err(e) = self.store.save_entry(record).await {
            tracing::error!("[Session] Failed to save {}: {}", kind, e);
        }
    }

    fn enter(&self, scene: Scene) {
        self.scene_tx.send_replace(scene);
        tracing::info!("[Session] {} entered {}", self.id, scene);
    }
}
