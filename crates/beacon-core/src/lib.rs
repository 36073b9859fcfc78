pub mod error;
pub use error::{CoreError, SurfaceError};

pub mod reduce;
pub use reduce::{add_elementwise, sum_pairwise};

pub mod surface;
pub use surface::{ConsoleSurface, MemorySurface, Surface, SurfacePreference, open_surface};

pub mod poll;
pub use poll::{PollConfig, PollExit, PollingUpdater};

pub mod consume;
pub use consume::{ConsumeOutcome, consume};
