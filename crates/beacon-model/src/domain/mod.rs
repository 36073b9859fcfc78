mod worker_id;
pub use worker_id::WorkerId;

mod status_message;
pub use status_message::StatusMessage;

mod envelope;
pub use envelope::Envelope;

/// Text value that the sentinel framing treats as the shutdown signal.
pub const SENTINEL: &str = "quit";
