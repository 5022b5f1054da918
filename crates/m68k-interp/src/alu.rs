//! Operation sizes and flag-computing arithmetic.

use crate::flags::Ccr;

/// Operation size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Byte,
    Word,
    Long,
}

impl Size {
    /// Standard 2-bit encoding (00=byte, 01=word, 10=long).
    #[must_use]
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits & 0x03 {
            0 => Some(Self::Byte),
            1 => Some(Self::Word),
            2 => Some(Self::Long),
            _ => None,
        }
    }

    /// MOVE encoding (01=byte, 11=word, 10=long).
    #[must_use]
    pub const fn from_move_bits(bits: u16) -> Option<Self> {
        match bits & 0x03 {
            1 => Some(Self::Byte),
            3 => Some(Self::Word),
            2 => Some(Self::Long),
            _ => None,
        }
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::Word => 16,
            Self::Long => 32,
        }
    }

    #[must_use]
    pub const fn msb_mask(self) -> u32 {
        match self {
            Self::Byte => 0x80,
            Self::Word => 0x8000,
            Self::Long => 0x8000_0000,
        }
    }

    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Self::Byte => 0xFF,
            Self::Word => 0xFFFF,
            Self::Long => 0xFFFF_FFFF,
        }
    }
}

/// Write `value` into the low `size` bits of `dst`, keeping the rest.
#[must_use]
pub const fn merge(dst: u32, value: u32, size: Size) -> u32 {
    let mask = size.mask();
    (dst & !mask) | (value & mask)
}

/// `dst + src` with N, Z, V, C and X updated.
pub fn add(src: u32, dst: u32, size: Size, ccr: &mut Ccr) -> u32 {
    let mask = size.mask();
    let msb = size.msb_mask();
    let s = src & mask;
    let d = dst & mask;
    let result = s.wrapping_add(d) & mask;

    ccr.z = result == 0;
    ccr.n = result & msb != 0;
    let carry = (s & d) | ((s | d) & !result);
    ccr.c = carry & msb != 0;
    ccr.x = ccr.c;
    ccr.v = (s ^ result) & (d ^ result) & msb != 0;
    result
}

/// `dst - src` with N, Z, V, C and X updated.
pub fn sub(src: u32, dst: u32, size: Size, ccr: &mut Ccr) -> u32 {
    let result = cmp(src, dst, size, ccr);
    ccr.x = ccr.c;
    result
}

/// `dst - src` with N, Z, V and C updated; X is left alone.
pub fn cmp(src: u32, dst: u32, size: Size, ccr: &mut Ccr) -> u32 {
    let mask = size.mask();
    let msb = size.msb_mask();
    let s = src & mask;
    let d = dst & mask;
    let result = d.wrapping_sub(s) & mask;

    ccr.z = result == 0;
    ccr.n = result & msb != 0;
    let borrow = (!d & s) | ((!d | s) & result);
    ccr.c = borrow & msb != 0;
    ccr.v = (s ^ d) & (result ^ d) & msb != 0;
    result
}
