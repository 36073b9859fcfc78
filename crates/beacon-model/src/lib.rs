//! Public data types shared by the status producers and the consumer.
//!
//! Nothing here spawns threads or processes; the types describe what flows between them.

mod domain;
pub use domain::*;

mod codec;
pub use codec::*;
