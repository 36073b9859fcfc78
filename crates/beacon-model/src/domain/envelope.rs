use serde::{Deserialize, Serialize};

use crate::StatusMessage;

/// Unit sent from producers to the consumer.
///
/// Shutdown is its own variant, so no status text can be mistaken for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Envelope {
    /// Render this message.
    Status(StatusMessage),
    /// Stop the consumer loop.
    Shutdown,
}

impl Envelope {
    /// Returns a short symbolic identifier, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Status(_) => "status",
            Envelope::Shutdown => "shutdown",
        }
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, Envelope::Shutdown)
    }
}

impl From<StatusMessage> for Envelope {
    fn from(msg: StatusMessage) -> Self {
        Envelope::Status(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_the_variant() {
        let status: Envelope = StatusMessage::from_text(None, "x").into();
        assert_eq!(status.kind(), "status");
        assert!(!status.is_shutdown());
        assert_eq!(Envelope::Shutdown.kind(), "shutdown");
    }
}
