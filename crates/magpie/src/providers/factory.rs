use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::{
    anthropic::AnthropicProvider, base::Provider, configs::ProviderConfig, openai::OpenAiProvider,
};
use crate::errors::AgentResult;

/// The closed set of supported backends. Adding a backend means adding a
/// variant and an adapter module; the agent loop never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderType {
    OpenAi,
    Anthropic,
}

pub fn get_provider(config: ProviderConfig) -> AgentResult<Box<dyn Provider>> {
    match config {
        ProviderConfig::OpenAi(openai_config) => Ok(Box::new(OpenAiProvider::new(openai_config)?)),
        ProviderConfig::Anthropic(anthropic_config) => {
            Ok(Box::new(AnthropicProvider::new(anthropic_config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_serialization() {
        assert_eq!(serde_json::to_string(&ProviderType::OpenAi).unwrap(), "\"openai\"");
        assert_eq!(
            serde_json::to_string(&ProviderType::Anthropic).unwrap(),
            "\"anthropic\""
        );
        let parsed: ProviderType = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(parsed, ProviderType::Anthropic);
    }

    #[test]
    fn test_provider_type_display() {
        assert_eq!(ProviderType::OpenAi.to_string(), "openai");
        assert_eq!(ProviderType::Anthropic.to_string(), "anthropic");
    }
}
