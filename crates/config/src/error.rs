#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid config: {0}")]
    Invalid(String),
}
