use std::fmt;

use serde::Serialize;

use crate::error::{DemoGenError, Result};

/// Burn intensity dial. Always within `0..=BurnLevel::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BurnLevel(u8);

impl BurnLevel {
    pub const MIN: BurnLevel = BurnLevel(0);
    pub const MAX: BurnLevel = BurnLevel(10);

    /// Validate a requested level. Out-of-range values are rejected, never clamped.
    pub fn new(n: i64) -> Result<Self> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&n) {
            Ok(Self(n as u8))
        } else {
            Err(DemoGenError::InvalidLevel(n))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_idle(self) -> bool {
        self.0 == 0
    }

    /// Only called with values previously produced by `new`.
    pub(crate) fn from_stored(raw: u8) -> Self {
        Self(raw.min(Self::MAX.0))
    }
}

impl TryFrom<i64> for BurnLevel {
    type Error = DemoGenError;

    fn try_from(n: i64) -> Result<Self> {
        Self::new(n)
    }
}

impl From<BurnLevel> for u8 {
    fn from(l: BurnLevel) -> u8 {
        l.0
    }
}

impl fmt::Display for BurnLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
