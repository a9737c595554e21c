use thiserror::Error;

#[derive(Error, Debug)]
pub enum UigenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signing key is not configured")]
    MissingSigningKey,

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, UigenError>;
