//! Deterministic runner for tests: replays canned responses in order

use super::{extend_history, ChatMessage, ProviderOutput, Runner};
use crate::error::ProviderError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub message: String,
    pub history_len: usize,
}

pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Duration,
}

impl ScriptedRunner {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Sleep this long (on the tokio clock) before every answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Runner for ScriptedRunner {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn submit(
        &self,
        system: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ProviderOutput, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            message: message.to_string(),
            history_len: history.len(),
        });

        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse));

        next.map(|content| ProviderOutput {
            history: extend_history(history, message, &content),
            content,
            duration: self.delay,
        })
    }
}
