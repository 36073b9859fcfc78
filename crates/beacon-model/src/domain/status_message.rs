use std::fmt;

use serde::{Deserialize, Serialize};

use crate::WorkerId;

/// Formatted status line published by a producer.
///
/// Immutable once built: identity is the content, nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Producer that published the update.
    ///
    /// `None` when the message arrived over a framing that does not carry the producer (raw text lines).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    worker: Option<WorkerId>,
    /// Text shown by the display surface.
    text: String,
}

impl StatusMessage {
    /// Build the canonical status line for `worker` carrying `value`.
    pub fn new(worker: WorkerId, value: f64) -> Self {
        Self {
            worker: Some(worker),
            text: format!("Worker {worker} called. Here is a random number {value}"),
        }
    }

    /// Build a status line for `worker` with a freshly drawn random number in `[0, 1)`.
    pub fn random(worker: WorkerId) -> Self {
        Self::new(worker, rand::random::<f64>())
    }

    /// Wrap arbitrary text, optionally attributed to a producer.
    pub fn from_text(worker: Option<WorkerId>, text: impl Into<String>) -> Self {
        Self {
            worker,
            text: text.into(),
        }
    }

    pub fn worker(&self) -> Option<WorkerId> {
        self.worker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
