use beacon_model::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface unavailable: {0}")]
    Unavailable(String),
    #[error("invalid surface preference: {0} (expected: auto|terminal|console)")]
    InvalidPreference(String),
    #[error("surface io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("shape mismatch: left has {left} elements, right has {right}")]
    ShapeMismatch { left: usize, right: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("spawn failed: {0}")]
    Spawn(String),

    #[error("display worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
