//! Oscillator rates shared between chips on one emulated board.

use crate::Ticks;

/// An oscillator driving one or more chips.
///
/// Each chip on a board is clocked from some oscillator, possibly divided or
/// multiplied. Cycle budgets handed to a chip are counted in this clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MasterClock {
    /// Frequency in Hz (e.g. `13_295_453` for an NTSC console's 68000).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Ticks per frame at the given frame rate (integer division).
    #[must_use]
    pub const fn ticks_per_frame(&self, frames_per_second: u64) -> Ticks {
        Ticks::new(self.frequency_hz / frames_per_second)
    }
}
