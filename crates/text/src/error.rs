use thiserror::Error;

/// Result type for text operations
pub type Result<T> = std::result::Result<T, TextError>;

#[derive(Error, Debug)]
pub enum TextError {
    /// Malformed CSV input
    #[error("CSV error at line {line}: {message}")]
    Csv { line: usize, message: String },

    /// Required column absent from the CSV header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Unknown stemmer: {0} (expected none|plural|porter)")]
    UnknownStemmer(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TextError {
    /// Create a CSV error
    pub fn csv(line: usize, message: impl Into<String>) -> Self {
        Self::Csv {
            line,
            message: message.into(),
        }
    }
}

impl From<csv::Error> for TextError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |pos| pos.line() as usize);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            _ => Self::csv(line, message),
        }
    }
}
