use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] livemarket_core::ValidationError),

    #[error(transparent)]
    Core(#[from] livemarket_core::CoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Core(livemarket_core::CoreError::Validation(_)) => 2,
            Self::Core(livemarket_core::CoreError::Serialization(_)) => 4,
            Self::Core(livemarket_core::CoreError::RuntimeUnavailable) => 1,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
