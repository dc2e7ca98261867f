use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Errors raised while loading, processing or saving an image.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// Input path unreadable or not decodable.
    #[error("Failed to load image: {}: {reason}", path.display())]
    LoadFailure { path: PathBuf, reason: String },

    /// Output raster empty or the encoder/write failed.
    #[error("Failed to save image: {}: {reason}", path.display())]
    SaveFailure { path: PathBuf, reason: String },

    /// Empty raster between stages or an invalid parameter.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Debug output error: {}: {reason}", path.display())]
    DebugOutput { path: PathBuf, reason: String },

    #[error("Failed to write report: {}: {reason}", path.display())]
    Report { path: PathBuf, reason: String },
}

impl ProcessingError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
