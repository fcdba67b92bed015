use thiserror::Error;

pub type LaunchResult<T> = Result<T, LaunchError>;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request validation error: {0}")]
    Validation(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Advertising API transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for LaunchError {
    fn from(err: config::ConfigError) -> Self {
        LaunchError::Config(err.to_string())
    }
}
