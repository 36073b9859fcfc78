use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid framing: {0} (expected: tagged|sentinel)")]
    InvalidFraming(String),
    #[error("text contains a line break and cannot be sent as a single frame")]
    EmbeddedNewline,
    #[error("malformed frame: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Malformed(e.to_string())
    }
}
