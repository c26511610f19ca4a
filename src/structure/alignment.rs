// Tue Jan 13 2026 - Alex

use crate::structure::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Alignment {
    value: u64,
}

impl Alignment {
    pub const ONE: Alignment = Alignment { value: 1 };

    pub fn new(value: u64) -> Result<Self, LayoutError> {
        if value == 0 || !value.is_power_of_two() {
            return Err(LayoutError::InvalidAlignment(value));
        }
        Ok(Self { value })
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    /// Rounds `offset` up to the next multiple of this alignment, or `None`
    /// when the result does not fit in a `u64`.
    pub fn align(&self, offset: u64) -> Option<u64> {
        offset
            .checked_add(self.value - 1)
            .map(|end| end & !(self.value - 1))
    }

    pub fn is_aligned(&self, offset: u64) -> bool {
        offset & (self.value - 1) == 0
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u64> for Alignment {
    type Error = LayoutError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alignment> for u64 {
    fn from(alignment: Alignment) -> Self {
        alignment.value
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_power_of_two() {
        assert_eq!(Alignment::new(0), Err(LayoutError::InvalidAlignment(0)));
        assert_eq!(Alignment::new(12), Err(LayoutError::InvalidAlignment(12)));
        assert!(Alignment::new(16).is_ok());
    }

    #[test]
    fn test_align_rounds_up() {
        let align = Alignment::new(8).unwrap();
        assert_eq!(align.align(0), Some(0));
        assert_eq!(align.align(1), Some(8));
        assert_eq!(align.align(8), Some(8));
        assert_eq!(align.align(68), Some(72));
        assert!(align.is_aligned(72));
        assert!(!align.is_aligned(68));
    }

    #[test]
    fn test_align_near_u64_max() {
        let align = Alignment::new(8).unwrap();
        assert_eq!(align.align(u64::MAX - 7), Some(u64::MAX - 7));
        assert_eq!(align.align(u64::MAX - 6), None);
        assert_eq!(Alignment::ONE.align(u64::MAX), Some(u64::MAX));
    }
}
