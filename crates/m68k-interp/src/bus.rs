//! Memory bus contract consumed by the 68000 core.
//!
//! The core performs no alignment or address-range checks; whatever the bus
//! does with an odd or unmapped address is the bus's business. Accesses are
//! sequential: one call returns before the next is issued.

use crate::execute::Boundary;

/// Raw acknowledge value requesting an autovector (`24 + level`).
pub const INT_ACK_AUTOVECTOR: u32 = 0xFFFF_FFFF;
/// Raw acknowledge value reporting a spurious interrupt (vector 24).
pub const INT_ACK_SPURIOUS: u32 = 0xFFFF_FFFE;

/// Result of an interrupt-acknowledge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntAck {
    /// No device supplied a vector; use the level's autovector.
    Autovector,
    /// No device responded at all.
    Spurious,
    /// A device placed this vector number on the bus.
    ///
    /// Values above 255 abort the exception: nothing is stacked and the mask
    /// is left alone.
    Vector(u32),
}

impl IntAck {
    /// Decode a raw acknowledge word using the two sentinel values.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            INT_ACK_AUTOVECTOR => Self::Autovector,
            INT_ACK_SPURIOUS => Self::Spurious,
            n => Self::Vector(n),
        }
    }

    /// The raw acknowledge word for this result.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::Autovector => INT_ACK_AUTOVECTOR,
            Self::Spurious => INT_ACK_SPURIOUS,
            Self::Vector(n) => n,
        }
    }
}

/// Bus trait for the 68000 core.
///
/// Long accesses are a single call; splitting them into two word cycles (or
/// not) is the implementor's choice.
pub trait M68kBus {
    /// Read a byte.
    fn read_byte(&mut self, addr: u32) -> u8;

    /// Read a big-endian word.
    fn read_word(&mut self, addr: u32) -> u16;

    /// Read a big-endian long.
    fn read_long(&mut self, addr: u32) -> u32 {
        let hi = self.read_word(addr);
        let lo = self.read_word(addr.wrapping_add(2));
        u32::from(hi) << 16 | u32::from(lo)
    }

    /// Write a byte.
    fn write_byte(&mut self, addr: u32, value: u8);

    /// Write a big-endian word.
    fn write_word(&mut self, addr: u32, value: u16);

    /// Write a big-endian long.
    fn write_long(&mut self, addr: u32, value: u32) {
        self.write_word(addr, (value >> 16) as u16);
        self.write_word(addr.wrapping_add(2), value as u16);
    }

    /// Interrupt acknowledge cycle for `level` (1-7).
    /// Default implementation requests the autovector.
    fn interrupt_ack(&mut self, _level: u8) -> IntAck {
        IntAck::Autovector
    }

    /// Called once per instruction boundary, after pending interrupts have
    /// been resolved and before the next opcode is fetched.
    ///
    /// Tracers and breakpoint engines hook in here. The boundary view allows
    /// latching interrupts and ending the timeslice without re-entering the
    /// core.
    fn instruction_hook(&mut self, _boundary: &mut Boundary<'_>) {}

    /// The RESET instruction asserted the reset line.
    fn reset(&mut self) {}
}
