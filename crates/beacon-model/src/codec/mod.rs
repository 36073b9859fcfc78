mod error;
pub use error::CodecError;

mod framing;
pub use framing::Framing;
