mod error;
pub use error::{ExecError, ExecResult};

mod util;

pub mod proc;
pub use proc::{ConsumerConfig, OutputMode, ProcessUpdater};

pub mod consumer;
pub use consumer::ConsumerArgs;
