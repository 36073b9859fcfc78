use std::{fmt, num::TryFromIntError};

use serde::{Deserialize, Serialize};

/// Identifier of a producer that publishes status updates.
///
/// Values are chosen by the caller (usually a thread or task index) and carry no meaning beyond display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(u32);

impl WorkerId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for WorkerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl TryFrom<usize> for WorkerId {
    type Error = TryFromIntError;

    fn try_from(id: usize) -> Result<Self, Self::Error> {
        u32::try_from(id).map(Self)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_conversion_keeps_small_values() {
        assert_eq!(WorkerId::try_from(7usize).unwrap(), WorkerId::new(7));
        assert_eq!(WorkerId::try_from(u32::MAX as usize).unwrap(), WorkerId::new(u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn index_conversion_rejects_out_of_range() {
        assert!(WorkerId::try_from(u32::MAX as usize + 6).is_err());
    }
}
