use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::message::Message;
use crate::models::tool::Tool;

/// Sampling knobs forwarded with a completion request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    /// Sampling randomness in [0, 2]
    pub temperature: Option<f32>,
    /// Hard cap on generated length
    pub max_tokens: Option<i32>,
}

/// Base trait for AI providers (OpenAI, Anthropic, etc).
///
/// An adapter owns the translation between the shared message model and one
/// vendor's request/response shapes, and nothing else: it does not retry,
/// and it reports failures as provider errors carrying the backend name.
/// Implementations must be safe to share across concurrent loop invocations.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Backend name used in error reporting
    fn name(&self) -> &str;

    /// Generate the next assistant message for the given conversation.
    ///
    /// `messages` excludes any leading system message; the system prompt is
    /// passed separately because backends treat it structurally differently.
    /// The returned message always has the assistant role, with a non-empty
    /// tool-call list when the backend requested tool use.
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
        options: &CompletionOptions,
    ) -> AgentResult<Message>;
}
