use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Completion, Gateway, GenerationFailure};

/// A scripted gateway for tests. Returns pre-defined replies in order and
/// records every prompt it receives.
pub struct MockGateway {
    replies: Vec<Result<Completion, GenerationFailure>>,
    repeat_last: bool,
    delay: Option<Duration>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new(replies: Vec<Result<Completion, GenerationFailure>>) -> Self {
        Self {
            replies,
            repeat_last: false,
            delay: None,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with the same text.
    pub fn replying(text: &str) -> Self {
        Self {
            repeat_last: true,
            ..Self::new(vec![Ok(Completion::new(text))])
        }
    }

    /// Always fail with the same detail.
    pub fn failing(detail: &str) -> Self {
        Self {
            repeat_last: true,
            ..Self::new(vec![Err(GenerationFailure::new(detail))])
        }
    }

    /// Sleep before every reply, to simulate a slow provider.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for MockGateway {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str) -> Result<Completion, GenerationFailure> {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = match self.replies.get(i) {
            Some(reply) => reply,
            None if self.repeat_last => self
                .replies
                .last()
                .ok_or_else(|| GenerationFailure::new("MockGateway: no replies scripted"))?,
            None => {
                return Err(GenerationFailure::new(format!(
                    "MockGateway: no more replies (called {} times)",
                    i + 1
                )));
            }
        };
        reply.clone()
    }
}
