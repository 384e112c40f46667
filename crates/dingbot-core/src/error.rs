use thiserror::Error;

#[derive(Debug, Error)]
pub enum DingbotError {
    #[error("config error: {0}")]
    Config(String),

    #[error("report error: {0}")]
    Report(String),

    #[error("webhook rejected message: {0}")]
    Delivery(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DingbotResult<T> = Result<T, DingbotError>;
