//! Conversation controller: opening question, replies and the rolling
//! summary.
//!
//! Each channel (opening, reply, summary) runs at most one request at a
//! time. A reply submitted while another is pending is rejected; a summary
//! refresh requested while one runs is folded into a single follow-up run.
//! The controller keeps the handle of the running refresh so
//! [`ConversationController::flush_summary`] can wait for it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use harmony_core::conversation::{ChatView, ConversationLog, TurnRole};
use harmony_core::error::{HarmonyError, Result};
use harmony_core::generation::{GenerationError, GenerationRequest, TextGenerator};
use harmony_core::journal::JournalStore;
use harmony_core::prompt::PromptSelection;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::in_flight::InFlightGuard;
use crate::prompts::{
    CoachReplyRequest, OPENING_USER_PROMPT, OpeningQuestionRequest, PromptTemplate,
    SUMMARY_USER_PROMPT, SummaryUpdateRequest,
};

#[derive(Default)]
struct ConversationState {
    log: ConversationLog,
    chat: ChatView,
    summary: Option<String>,
}

/// A delivered reply.
#[derive(Debug)]
pub struct Reply {
    pub text: String,
    /// Whether this reply started a summary refresh; `false` when it was
    /// folded into one already running.
    pub summary_refresh_started: bool,
}

pub struct ConversationController {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn JournalStore>,
    max_tokens: u32,
    state: RwLock<ConversationState>,
    opening_in_flight: AtomicBool,
    reply_in_flight: AtomicBool,
    summary_running: AtomicBool,
    summary_pending: AtomicBool,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl ConversationController {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn JournalStore>,
        max_tokens: u32,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            generator,
            store,
            max_tokens,
            state: RwLock::new(ConversationState::default()),
            opening_in_flight: AtomicBool::new(false),
            reply_in_flight: AtomicBool::new(false),
            summary_running: AtomicBool::new(false),
            summary_pending: AtomicBool::new(false),
            refresh_task: Mutex::new(None),
            cancel,
        }
    }

    pub async fn chat_view(&self) -> ChatView {
        self.state.read().await.chat.clone()
    }

    pub async fn log(&self) -> ConversationLog {
        self.state.read().await.log.clone()
    }

    pub async fn summary(&self) -> Option<String> {
        self.state.read().await.summary.clone()
    }

    /// Asks for the opening question and shows it.
    ///
    /// On failure the chat's status line switches to the connection error
    /// and the input stays hidden.
    pub async fn open(&self, selection: &PromptSelection, summary: Option<String>) -> Result<String> {
        let Some(_guard) = InFlightGuard::try_acquire(&self.opening_in_flight) else {
            return Err(HarmonyError::in_flight("opening"));
        };

        self.state.write().await.summary = summary.clone();

        tracing::debug!(
            "[Conversation] Opening category={} context=\"{}\"",
            selection.category,
            selection.data_context()
        );
        let system_prompt = OpeningQuestionRequest {
            history: summary,
            template: selection.question(),
        }
        .to_prompt()?;

        match self.generate(system_prompt, OPENING_USER_PROMPT.to_string()).await {
            Ok(question) => {
                let mut state = self.state.write().await;
                state.chat.show_opening(&question);
                state.log.push(TurnRole::Assistant, question.trim());
                tracing::info!("[Conversation] Opening question delivered");
                Ok(question.trim().to_string())
            }
            Err(GenerationError::Cancelled) => Err(HarmonyError::Cancelled("opening".into())),
            Err(e) => {
                tracing::error!("[Conversation] Opening question failed: {}", e);
                self.state.write().await.chat.fail_opening();
                Err(e.into())
            }
        }
    }

    /// Sends a user message and waits for the coach's reply.
    ///
    /// Empty input returns `Ok(None)` without touching anything. A failed
    /// call leaves the user's turn in the log and the error marker in the
    /// chat.
    pub async fn submit(self: &Arc<Self>, text: &str) -> Result<Option<Reply>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let Some(_guard) = InFlightGuard::try_acquire(&self.reply_in_flight) else {
            return Err(HarmonyError::in_flight("reply"));
        };
        let system_prompt = CoachReplyRequest::default().to_prompt()?;

        let (pending, transcript) = {
            let mut state = self.state.write().await;
            if !state.chat.input_enabled() {
                return Err(HarmonyError::invalid_transition(
                    "send a message",
                    "a conversation without an opening question",
                ));
            }
            state.chat.push_final(TurnRole::User, text);
            state.log.push(TurnRole::User, text);
            let pending = state.chat.push_pending();
            (pending, state.log.coach_transcript())
        };

        match self.generate(system_prompt, transcript).await {
            Ok(reply) => {
                let reply = reply.trim().to_string();
                {
                    let mut state = self.state.write().await;
                    state.chat.resolve(pending, &reply);
                    state.log.push(TurnRole::Assistant, reply.as_str());
                }
                let summary_refresh_started = self.request_summary_refresh().await;
                Ok(Some(Reply {
                    text: reply,
                    summary_refresh_started,
                }))
            }
            Err(GenerationError::Cancelled) => {
                self.state.write().await.chat.fail(pending);
                Err(HarmonyError::Cancelled("reply".into()))
            }
            Err(e) => {
                tracing::warn!(
                    "[Conversation] Reply failed (retryable={}): {}",
                    e.is_retryable(),
                    e
                );
                self.state.write().await.chat.fail(pending);
                Err(e.into())
            }
        }
    }

    /// Schedules a summary refresh in the background.
    ///
    /// Returns `false` when a refresh is already running; that run picks the
    /// request up once it finishes.
    pub async fn request_summary_refresh(self: &Arc<Self>) -> bool {
        // Held across the spawn so a flush never misses a starting run.
        let mut slot = self.refresh_task.lock().await;
        self.summary_pending.store(true, Ordering::SeqCst);
        if self.summary_running.swap(true, Ordering::SeqCst) {
            tracing::debug!("[Conversation] Summary refresh coalesced");
            return false;
        }

        let this = Arc::clone(self);
        *slot = Some(tokio::spawn(async move { this.run_summary_refreshes().await }));
        true
    }

    /// Waits until no summary refresh is running or queued.
    pub async fn flush_summary(&self) {
        loop {
            let Some(handle) = self.refresh_task.lock().await.take() else {
                return;
            };
            if let Err(e) = handle.await {
                tracing::warn!("[Conversation] Summary refresh task failed: {}", e);
            }
        }
    }

    async fn run_summary_refreshes(&self) {
        loop {
            while self.summary_pending.swap(false, Ordering::SeqCst) {
                if self.cancel.is_cancelled() {
                    break;
                }
                self.refresh_summary_once().await;
            }
            self.summary_running.store(false, Ordering::SeqCst);

            // A request may have landed between the last check and the release.
            if !self.summary_pending.load(Ordering::SeqCst)
                || self.summary_running.swap(true, Ordering::SeqCst)
            {
                break;
            }
        }
    }

    async fn refresh_summary_once(&self) {
        let (old_summary, log) = {
            let state = self.state.read().await;
            (state.summary.clone(), state.log.scribe_log())
        };

        let system_prompt = match (SummaryUpdateRequest { old_summary, log }).to_prompt() {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("[Conversation] Failed to update memory: {}", e);
                return;
            }
        };

        match self.generate(system_prompt, SUMMARY_USER_PROMPT.to_string()).await {
            Ok(summary) => {
                let summary = summary.trim();
                if summary.is_empty() {
                    return;
                }
                if let Err(e) = self.store.save_summary(summary).await {
                    tracing::warn!("[Conversation] Failed to persist summary: {}", e);
                }
                self.state.write().await.summary = Some(summary.to_string());
                tracing::info!("[Conversation] Patient file updated");
            }
            Err(e) => tracing::warn!("[Conversation] Failed to update memory: {}", e),
        }
    }

    /// Runs one generation call, giving up early if the scene ends.
    async fn generate(
        &self,
        system_prompt: String,
        prompt: String,
    ) -> std::result::Result<String, GenerationError> {
        let request =
            GenerationRequest::new(system_prompt, prompt).with_max_tokens(self.max_tokens);
        tokio::select! {
            _ = self.cancel.cancelled() => Err(GenerationError::Cancelled),
            result = self.generator.generate(request) => result,
        }
    }
}
