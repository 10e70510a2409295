//! Hour-slot catalog
//!
//! Every run picks its active hours from a fixed window of 17 clock hours
//! running from 16:00 through 08:00 the next morning. A slot is identified
//! by its catalog index, never by the clock hour, so the window can wrap
//! midnight without breaking ordering.
//!
//! ```rust
//! use staffopt_core::HourSlot;
//!
//! let slot = HourSlot::new(8).unwrap();
//! assert_eq!(slot.clock_hour(), 0);
//! assert_eq!(slot.label(), "00h");
//! ```

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Clock hours covered by the catalog, in catalog order.
pub const CLOCK_HOURS: [u8; 17] = [16, 17, 18, 19, 20, 21, 22, 23, 0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Number of slots in the catalog
pub const CATALOG_LEN: usize = CLOCK_HOURS.len();

/// Index into the hour-slot catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourSlot(u8);

impl HourSlot {
    /// Create a slot from a catalog index.
    pub fn new(index: u8) -> Result<Self, ValidationError> {
        if (index as usize) < CATALOG_LEN {
            Ok(Self(index))
        } else {
            Err(ValidationError::UnknownHourSlot(index))
        }
    }

    /// All catalog slots, in order
    pub fn all() -> impl Iterator<Item = HourSlot> {
        (0..CATALOG_LEN as u8).map(HourSlot)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Wall-clock hour (0-23) this slot stands for
    pub fn clock_hour(self) -> u8 {
        CLOCK_HOURS[self.0 as usize]
    }

    /// Column label, e.g. `"16h"` or `"03h"`
    pub fn label(self) -> String {
        format!("{:02}h", self.clock_hour())
    }
}

impl std::fmt::Display for HourSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<u8> for HourSlot {
    type Error = ValidationError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}
