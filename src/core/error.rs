use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("narration recovery failed after {attempts} attempts")]
    RecoveryExhausted { attempts: u32 },

    #[error("roster error: {0}")]
    Roster(String),

    #[error("sprite error: {0}")]
    Sprite(String),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
