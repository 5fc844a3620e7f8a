use glitch_engine::{BufferError, GlitchError, SpectralError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG layout: {color_type} at {bit_depth} bits")]
    UnsupportedLayout { color_type: String, bit_depth: u8 },

    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Munge needs an undo buffer")]
    MissingBackup,

    #[error("Munge needs a snapshot")]
    MissingSnapshot,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error(transparent)]
    Engine(#[from] GlitchError),
}

impl From<SpectralError> for SessionError {
    fn from(e: SpectralError) -> Self {
        SessionError::Engine(e.into())
    }
}

impl From<BufferError> for SessionError {
    fn from(e: BufferError) -> Self {
        SessionError::Engine(e.into())
    }
}
