use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed food data: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Nutrition provider error: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl TrackerError {
    /// True for bad user input or structurally invalid imported data.
    pub fn is_validation(&self) -> bool {
        matches!(self, TrackerError::Validation(_))
    }

    /// True for syntactically malformed import text.
    pub fn is_parse(&self) -> bool {
        matches!(self, TrackerError::Parse(_))
    }

    /// True for network or service failures from the nutrition provider.
    pub fn is_provider(&self) -> bool {
        matches!(self, TrackerError::Provider(_))
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
