//! Core configuration.

use emu_core::{MasterClock, Ticks};

use crate::clock::ClockMultiplier;

/// 68000 clock on PAL consoles, in Hz.
pub const PAL_CLOCK_HZ: u64 = 13_296_950;
/// 68000 clock on NTSC consoles, in Hz.
pub const NTSC_CLOCK_HZ: u64 = 13_295_453;

/// Video region. Selects the 68000 clock and the frame rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    Pal,
    #[default]
    Ntsc,
}

impl Region {
    #[must_use]
    pub const fn clock(self) -> MasterClock {
        match self {
            Region::Pal => MasterClock::new(PAL_CLOCK_HZ),
            Region::Ntsc => MasterClock::new(NTSC_CLOCK_HZ),
        }
    }

    #[must_use]
    pub const fn frames_per_second(self) -> u64 {
        match self {
            Region::Pal => 50,
            Region::Ntsc => 60,
        }
    }
}

/// Settings applied by [`Cpu68000::from_config`](crate::Cpu68000::from_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoreConfig {
    pub region: Region,
    /// CPU speed relative to the rest of the machine. Values below 1 are
    /// treated as 1.
    pub clock_multiplier: i32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            clock_multiplier: 1,
        }
    }
}

impl CoreConfig {
    #[must_use]
    pub const fn multiplier(&self) -> ClockMultiplier {
        ClockMultiplier::new(self.clock_multiplier)
    }

    /// Host cycles in one video frame (unscaled).
    #[must_use]
    pub const fn cycles_per_frame(&self) -> Ticks {
        self.region.clock().ticks_per_frame(self.region.frames_per_second())
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, Region};

    #[test]
    fn region_clocks() {
        assert_eq!(Region::Pal.clock().frequency_hz, 13_296_950);
        assert_eq!(Region::Ntsc.clock().frequency_hz, 13_295_453);
    }

    #[test]
    fn frame_budget_by_region() {
        let ntsc = CoreConfig::default();
        assert_eq!(ntsc.cycles_per_frame().get(), 13_295_453 / 60);
        let pal = CoreConfig {
            region: Region::Pal,
            clock_multiplier: 1,
        };
        assert_eq!(pal.cycles_per_frame().get(), 265_939);
    }

    #[test]
    fn multiplier_clamps() {
        let fast = CoreConfig {
            region: Region::Ntsc,
            clock_multiplier: 2,
        };
        assert_eq!(fast.multiplier().get(), 2);
        let bogus = CoreConfig {
            region: Region::Pal,
            clock_multiplier: 0,
        };
        assert_eq!(bogus.multiplier().get(), 1);
    }
}
