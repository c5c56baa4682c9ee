use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from the environment: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("{0} must be set.")]
    MissingVar(&'static str),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
