use std::io;

use beacon_model::CodecError;
use thiserror::Error;

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("missing program")]
    MissingProgram,
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("not connected")]
    NotConnected,
    #[error("non-zero exit code: {code}")]
    NonZeroExit { code: i32 },
    #[error("killed by signal")]
    KilledBySignal,
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("io error: {0}")]
    Io(String),
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        if is_disconnect(&e) {
            return ExecError::NotConnected;
        }
        ExecError::Io(e.to_string())
    }
}

/// `true` for errors meaning the other end of the pipe is gone.
pub(crate) fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset | io::ErrorKind::NotConnected
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_pipe_maps_to_not_connected() {
        let err: ExecError = io::Error::from(io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, ExecError::NotConnected));
    }

    #[test]
    fn other_io_errors_keep_their_message() {
        let err: ExecError = io::Error::other("disk on fire").into();
        assert!(matches!(err, ExecError::Io(ref s) if s.contains("disk on fire")));
    }
}
