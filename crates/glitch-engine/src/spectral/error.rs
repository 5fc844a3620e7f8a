use thiserror::Error;

/// Errors raised by the spectral band engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpectralError {
    #[error("unsupported FFT block edge {0}: must be a power of two between 2 and 1024")]
    UnsupportedBlockSize(u32),

    #[error("FFT failed: {0}")]
    Transform(String),

    #[error("block length mismatch: expected {expected} samples, got {actual}")]
    BlockLength { expected: usize, actual: usize },
}
