//! Status register layout and condition codes.
//!
//! The status register is 16 bits:
//! - Bits 0-4: Condition code register (CCR): C, V, Z, N, X
//! - Bits 8-10: Interrupt mask (I0, I1, I2)
//! - Bit 13: Supervisor mode (S)
//! - Bit 15: Trace mode (T)
//!
//! The core never stores the packed word. The condition codes live in
//! [`Ccr`] and the system byte in separate register-file fields; packing
//! happens only when SR is read or stacked.

/// Carry flag.
pub const C: u16 = 0x0001;
/// Overflow flag.
pub const V: u16 = 0x0002;
/// Zero flag.
pub const Z: u16 = 0x0004;
/// Negative flag.
pub const N: u16 = 0x0008;
/// Extend flag.
pub const X: u16 = 0x0010;

/// Supervisor mode flag.
pub const S: u16 = 0x2000;
/// Trace mode flag.
pub const T: u16 = 0x8000;

/// Mask for condition codes only (bits 0-4).
pub const CCR_MASK: u16 = 0x001F;
/// Interrupt mask field (bits 8-10).
pub const INTMASK_MASK: u16 = 0x0700;
/// Mask for valid SR bits (excluding reserved bits).
pub const SR_MASK: u16 = 0xA71F;

/// Decomposed condition codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ccr {
    pub x: bool,
    pub n: bool,
    pub z: bool,
    pub v: bool,
    pub c: bool,
}

impl Ccr {
    /// Pack into the low five bits of SR.
    #[must_use]
    pub const fn bits(self) -> u16 {
        (self.x as u16) << 4
            | (self.n as u16) << 3
            | (self.z as u16) << 2
            | (self.v as u16) << 1
            | self.c as u16
    }

    /// Unpack from the low byte of SR; bits 5-7 are ignored.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            x: bits & X != 0,
            n: bits & N != 0,
            z: bits & Z != 0,
            v: bits & V != 0,
            c: bits & C != 0,
        }
    }

    /// Set N and Z from a value of `width` bits (8, 16 or 32).
    pub fn set_nz(&mut self, value: u32, width: u32) {
        let mask = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
        let v = value & mask;
        self.z = v == 0;
        self.n = v >> (width - 1) & 1 != 0;
    }

    /// MOVE-style update: N and Z from the value, V and C cleared, X kept.
    pub fn set_logic(&mut self, value: u32, width: u32) {
        self.set_nz(value, width);
        self.v = false;
        self.c = false;
    }

    /// Evaluate a condition code (0-15).
    #[must_use]
    pub const fn condition(self, cc: u8) -> bool {
        match cc & 0x0F {
            0x0 => true,                   // T
            0x1 => false,                  // F
            0x2 => !self.c && !self.z,     // HI
            0x3 => self.c || self.z,       // LS
            0x4 => !self.c,                // CC/HS
            0x5 => self.c,                 // CS/LO
            0x6 => !self.z,                // NE
            0x7 => self.z,                 // EQ
            0x8 => !self.v,                // VC
            0x9 => self.v,                 // VS
            0xA => !self.n,                // PL
            0xB => self.n,                 // MI
            0xC => self.n == self.v,       // GE
            0xD => self.n != self.v,       // LT
            0xE => !self.z && self.n == self.v, // GT
            _ => self.z || self.n != self.v,    // LE
        }
    }
}

/// Pack the decomposed status fields into an SR word.
#[must_use]
pub const fn pack_sr(ccr: Ccr, intmask: u8, s: bool, t: bool) -> u16 {
    (t as u16) << 15 | (s as u16) << 13 | ((intmask & 7) as u16) << 8 | ccr.bits()
}

/// Split an SR word into `(ccr, intmask, s, t)`. Reserved bits are dropped.
#[must_use]
pub const fn unpack_sr(sr: u16) -> (Ccr, u8, bool, bool) {
    let sr = sr & SR_MASK;
    (
        Ccr::from_bits(sr & CCR_MASK),
        ((sr & INTMASK_MASK) >> 8) as u8,
        sr & S != 0,
        sr & T != 0,
    )
}
