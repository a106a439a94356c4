use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF operation failed: {0}")]
    OperationError(#[from] lopdf::Error),

    #[error("Failed to serialize PDF: {0}")]
    SerializeError(#[from] std::io::Error),
}
