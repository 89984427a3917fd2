use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Labels must be integer class ids.
    #[error("labels must be integer class ids: {0}")]
    LabelType(String),

    #[error("label {label} is out of range for {n_classes} classes")]
    LabelOutOfRange { label: usize, n_classes: usize },

    #[error("batch index {index} out of bounds ({num_batches} batches)")]
    BatchOutOfBounds { index: usize, num_batches: usize },

    /// Probability underflow or a non-finite loss, usually a diverging learning rate.
    #[error("numeric error: {0}")]
    Numeric(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
