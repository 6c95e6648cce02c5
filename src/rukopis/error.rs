use thiserror::Error;

#[derive(Error, Debug)]
pub enum RukopisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),

    /// Opaque failure from an external collaborator (LLM or speech
    /// synthesis). No retry policy is attached; each call is a single
    /// best-effort attempt.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, RukopisError>;
