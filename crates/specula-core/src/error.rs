use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeculaError {
    #[error("Failed to decode probe data: {0}")]
    Decode(String),

    #[error("Failed to encode probe data: {0}")]
    Encode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpeculaError>;
