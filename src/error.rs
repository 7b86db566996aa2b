use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Invalid date '{value}' on row {line}: {source}")]
    InvalidDate {
        line: usize,
        value: String,
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
