#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use harmony_core::generation::{GenerationError, GenerationRequest, TextGenerator};
use tokio::sync::Semaphore;

type Responder = Box<dyn Fn(&GenerationRequest) -> Result<String, GenerationError> + Send + Sync>;
type Matcher = fn(&GenerationRequest) -> bool;

pub fn is_opening(request: &GenerationRequest) -> bool {
    request.prompt == "Please give me the question."
}

pub fn is_summary(request: &GenerationRequest) -> bool {
    request.prompt == "Update the file."
}

pub fn is_reply(request: &GenerationRequest) -> bool {
    request.prompt.ends_with("\nCoach:")
}

/// Generator double: answers through a closure, records every request and
/// can hold matching requests until permits are released.
pub struct MockGenerator {
    responder: Responder,
    requests: Mutex<Vec<GenerationRequest>>,
    gate: Option<(Matcher, Arc<Semaphore>)>,
}

impl MockGenerator {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<String, GenerationError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Answers every channel with fixed text.
    pub fn scripted(opening: &'static str, reply: &'static str, summary: &'static str) -> Self {
        Self::new(move |request| {
            Ok(if is_opening(request) {
                opening.to_string()
            } else if is_summary(request) {
                summary.to_string()
            } else {
                reply.to_string()
            })
        })
    }

    pub fn with_gate(mut self, matcher: Matcher, permits: Arc<Semaphore>) -> Self {
        self.gate = Some((matcher, permits));
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: Matcher) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matcher(r))
            .count()
    }

    /// Yields until at least `n` matching requests have arrived.
    pub async fn wait_for(&self, matcher: Matcher, n: usize) {
        while self.count(matcher) < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some((matcher, permits)) = &self.gate {
            if matcher(&request) {
                permits
                    .acquire()
                    .await
                    .map_err(|e| GenerationError::Other(e.to_string()))?
                    .forget();
            }
        }
        (self.responder)(&request)
    }
}
