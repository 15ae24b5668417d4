use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a dotted settings path to the environment variable that supplies it.
pub fn to_env_var(field: &str) -> String {
    format!("MAGPIE_{}", field.replace('.', "__").to_uppercase())
}
