use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{CompletionOptions, Provider};

/// A mock provider that returns pre-configured responses for testing.
///
/// It also records every conversation it is asked to complete, so loop tests
/// can assert on call counts and on the exact history the next completion
/// would have seen. Clones share the same script and recordings.
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Message>>>,
    conversations: Arc<Mutex<Vec<Vec<Message>>>>,
    fail_when_exhausted: bool,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            conversations: Arc::new(Mutex::new(Vec::new())),
            fail_when_exhausted: false,
        }
    }

    /// As `new`, but completions fail once the scripted responses run out
    pub fn failing_after(responses: Vec<Message>) -> Self {
        Self {
            fail_when_exhausted: true,
            ..Self::new(responses)
        }
    }

    /// Number of completion calls made so far
    pub fn call_count(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }

    /// The conversation passed to each completion call, in call order
    pub fn recorded_conversations(&self) -> Vec<Vec<Message>> {
        self.conversations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        _system: &str,
        messages: &[Message],
        _tools: &[Tool],
        _options: &CompletionOptions,
    ) -> AgentResult<Message> {
        self.conversations.lock().unwrap().push(messages.to_vec());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            if self.fail_when_exhausted {
                return Err(AgentError::provider("mock", "scripted responses exhausted"));
            }
            Ok(Message::assistant(""))
        } else {
            Ok(responses.remove(0))
        }
    }
}
