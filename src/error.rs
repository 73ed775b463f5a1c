use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Failed to create order: {0}")]
    OrderCreation(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid keypad digit: {0:?}")]
    InvalidDigit(char),
    #[error("Invalid keypad command: {0:?}")]
    InvalidCommand(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
