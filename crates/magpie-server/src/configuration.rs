use std::net::SocketAddr;

use config::{Config, Environment};
use serde::Deserialize;

use magpie::agents::config::AgentConfig;
use magpie::errors::{AgentError, AgentResult};
use magpie::providers::configs::{
    AnthropicProviderConfig, OpenAiProviderConfig, ProviderConfig,
};
use magpie::providers::factory::ProviderType;

use crate::error::{to_env_var, ConfigError};

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Failed to parse socket address")
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default = "default_openai_host")]
    pub host: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct AnthropicSettings {
    #[serde(default = "default_anthropic_host")]
    pub host: String,
    pub api_key: String,
}

/// Credentials per backend. A backend left unconfigured is not an error at
/// startup; agents bound to it fail at request time instead.
#[derive(Debug, Default, Deserialize)]
pub struct ProvidersSettings {
    #[serde(default)]
    pub openai: Option<OpenAiSettings>,
    #[serde(default)]
    pub anthropic: Option<AnthropicSettings>,
}

impl ProvidersSettings {
    pub fn any_configured(&self) -> bool {
        self.openai.is_some() || self.anthropic.is_some()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub providers: ProvidersSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Layer on the environment variables, e.g.
            // MAGPIE_PROVIDERS__OPENAI__API_KEY -> providers.openai.api_key
            .add_source(
                Environment::with_prefix("MAGPIE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match config.try_deserialize::<Self>() {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                // Handle both NotFound and missing field message variants
                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches('`');
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }

    /// The provider configuration backing the given agent, or an error when
    /// that backend has no credentials configured.
    pub fn provider_config_for(&self, agent: &AgentConfig) -> AgentResult<ProviderConfig> {
        match agent.provider {
            ProviderType::OpenAi => self
                .providers
                .openai
                .as_ref()
                .map(|settings| {
                    ProviderConfig::OpenAi(OpenAiProviderConfig {
                        host: settings.host.clone(),
                        api_key: settings.api_key.clone(),
                        model: agent.model.clone(),
                    })
                })
                .ok_or_else(|| AgentError::provider("openai", "no credentials configured")),
            ProviderType::Anthropic => self
                .providers
                .anthropic
                .as_ref()
                .map(|settings| {
                    ProviderConfig::Anthropic(AnthropicProviderConfig {
                        host: settings.host.clone(),
                        api_key: settings.api_key.clone(),
                        model: agent.model.clone(),
                    })
                })
                .ok_or_else(|| AgentError::provider("anthropic", "no credentials configured")),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4003
}

fn default_openai_host() -> String {
    "https://api.openai.com".to_string()
}

fn default_anthropic_host() -> String {
    "https://api.anthropic.com".to_string()
}
