//! Clock multiplier between the host's cycle units and the core's.
//!
//! Budgets handed to [`execute`](crate::Cpu68000::execute) are in host
//! cycles. Internally everything counts in scaled cycles (host cycles times
//! the multiplier), so a multiplier of 2 runs the CPU twice as fast relative
//! to the rest of the machine.

/// Integer multiplier, never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockMultiplier(i32);

impl Default for ClockMultiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl ClockMultiplier {
    pub const ONE: Self = Self(1);

    /// Values below 1 clamp to 1.
    #[must_use]
    pub const fn new(mult: i32) -> Self {
        if mult < 1 { Self::ONE } else { Self(mult) }
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Host cycles to scaled cycles.
    #[must_use]
    pub const fn scale(self, cycles: i32) -> i32 {
        cycles.saturating_mul(self.0)
    }

    /// Scaled cycles to host cycles, truncating toward zero.
    #[must_use]
    pub const fn descale(self, cycles: i32) -> i32 {
        cycles / self.0
    }
}
