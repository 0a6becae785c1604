use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Payment provider initialization failed: {0}")]
    ProviderInitError(String),
    #[error("Tokenization error: {0}")]
    TokenizationError(String),
    #[error("Tokenization timed out after {0} ms")]
    TimeoutError(u128),
    #[error("Order relay error: {0}")]
    RelayError(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
