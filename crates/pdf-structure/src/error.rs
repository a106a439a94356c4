use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF: {0}")]
    ParseError(#[from] lopdf::Error),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
}
