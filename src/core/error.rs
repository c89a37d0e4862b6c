use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tuning parse error: {0}")]
    TuningParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DuelError>;
