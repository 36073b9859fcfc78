//! Line framing for the producer → consumer pipe.
//!
//! Every [`Envelope`] travels as exactly one line (the terminating `\n` is added by the writer).
//! Two framings exist:
//! - [`Framing::Tagged`]: one JSON object per line, shutdown is a distinct tag.
//! - [`Framing::Sentinel`]: raw text per line, the line [`SENTINEL`] means shutdown.
//!
//! With `Sentinel`, a status whose text equals [`SENTINEL`] is indistinguishable from shutdown and stops the consumer.
//! `Tagged` has no such collision and is the default.
use std::{fmt, str::FromStr};

use crate::{CodecError, Envelope, SENTINEL, StatusMessage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Framing {
    #[default]
    Tagged,
    Sentinel,
}

impl Framing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framing::Tagged => "tagged",
            Framing::Sentinel => "sentinel",
        }
    }

    /// Encode one envelope as a single line, without the trailing newline.
    pub fn encode(&self, envelope: &Envelope) -> Result<String, CodecError> {
        match self {
            Framing::Tagged => Ok(serde_json::to_string(envelope)?),
            Framing::Sentinel => match envelope {
                Envelope::Shutdown => Ok(SENTINEL.to_string()),
                Envelope::Status(msg) => {
                    if msg.text().contains(['\n', '\r']) {
                        return Err(CodecError::EmbeddedNewline);
                    }
                    Ok(msg.text().to_string())
                }
            },
        }
    }

    /// Decode one line; a trailing `\n` / `\r\n` is ignored.
    pub fn decode(&self, line: &str) -> Result<Envelope, CodecError> {
        let line = line.trim_end_matches(['\n', '\r']);
        match self {
            Framing::Tagged => Ok(serde_json::from_str(line)?),
            Framing::Sentinel if line == SENTINEL => Ok(Envelope::Shutdown),
            Framing::Sentinel => Ok(Envelope::Status(StatusMessage::from_text(None, line))),
        }
    }
}

impl FromStr for Framing {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "tagged" | "json" => Ok(Framing::Tagged),
            "sentinel" | "text" => Ok(Framing::Sentinel),
            _ => Err(CodecError::InvalidFraming(s.to_string())),
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
