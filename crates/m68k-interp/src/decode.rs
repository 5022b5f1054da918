//! Full 65536-entry decode table.
//!
//! Instruction definitions carry a 16-character bit pattern in the style of
//! the classic 68000 opcode listings: `0` and `1` are fixed bits, any letter
//! is an operand field. For example MOVEQ is `0111rrr0dddddddd`.
//!
//! Building the table has two phases:
//!
//! - **read**: every opcode matching a definition (pattern plus optional
//!   operand constraint) is tagged with that definition's mnemonic and CPU
//!   level. Later definitions override earlier ones.
//! - **merge**: every tagged opcode is redirected to its definition's
//!   *representative*, the lowest opcode still owned by that definition. The
//!   dispatch table installs one handler per representative and copies it to
//!   every redirected slot.

use crate::table::{InstrHandler, OpDescriptor, TableError};

/// Instruction class tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    /// Not an instruction on any modelled CPU level.
    Illg,
    OriSr,
    AndiSr,
    Move,
    MoveFromSr,
    MoveToSr,
    Clr,
    Tst,
    Swap,
    Extb,
    Lea,
    Trap,
    Reset,
    Nop,
    Stop,
    Rte,
    Rts,
    Jsr,
    Jmp,
    Addq,
    Subq,
    Dbcc,
    Bcc,
    Bsr,
    Moveq,
    Add,
    Sub,
    Cmp,
}

impl Mnemonic {
    /// Assembler spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mnemonic::Illg => "ILLEGAL",
            Mnemonic::OriSr => "ORI to SR",
            Mnemonic::AndiSr => "ANDI to SR",
            Mnemonic::Move => "MOVE",
            Mnemonic::MoveFromSr => "MOVE from SR",
            Mnemonic::MoveToSr => "MOVE to SR",
            Mnemonic::Clr => "CLR",
            Mnemonic::Tst => "TST",
            Mnemonic::Swap => "SWAP",
            Mnemonic::Extb => "EXTB",
            Mnemonic::Lea => "LEA",
            Mnemonic::Trap => "TRAP",
            Mnemonic::Reset => "RESET",
            Mnemonic::Nop => "NOP",
            Mnemonic::Stop => "STOP",
            Mnemonic::Rte => "RTE",
            Mnemonic::Rts => "RTS",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Addq => "ADDQ",
            Mnemonic::Subq => "SUBQ",
            Mnemonic::Dbcc => "DBcc",
            Mnemonic::Bcc => "Bcc",
            Mnemonic::Bsr => "BSR",
            Mnemonic::Moveq => "MOVEQ",
            Mnemonic::Add => "ADD",
            Mnemonic::Sub => "SUB",
            Mnemonic::Cmp => "CMP",
        }
    }
}

/// Fixed-bit mask and value parsed from a pattern string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub mask: u16,
    pub bits: u16,
}

impl Pattern {
    /// Parse a 16-character bit pattern.
    pub fn parse(pattern: &'static str) -> Result<Self, TableError> {
        if pattern.len() != 16 {
            return Err(TableError::BadPattern { pattern });
        }
        let mut mask = 0u16;
        let mut bits = 0u16;
        for ch in pattern.chars() {
            mask <<= 1;
            bits <<= 1;
            match ch {
                '0' => mask |= 1,
                '1' => {
                    mask |= 1;
                    bits |= 1;
                }
                c if c.is_ascii_alphabetic() => {}
                _ => return Err(TableError::BadPattern { pattern }),
            }
        }
        Ok(Self { mask, bits })
    }

    #[must_use]
    pub const fn matches(self, opcode: u16) -> bool {
        opcode & self.mask == self.bits
    }

    /// Every matching opcode, in ascending order.
    pub fn opcodes(self) -> impl Iterator<Item = u16> {
        let free = !self.mask;
        let mut next = Some(0u16);
        std::iter::from_fn(move || {
            let sub = next?;
            next = (sub != free).then(|| sub.wrapping_sub(free) & free);
            Some(self.bits | sub)
        })
    }
}

/// One instruction definition.
#[derive(Clone, Copy)]
pub struct InstrDef {
    pub pattern: &'static str,
    pub mnemonic: Mnemonic,
    /// Minimum CPU level: 0 for the 68000, 1 for 68010, 2 for 68020...
    pub clev: u8,
    /// Extra operand filter (valid EA modes, size fields...).
    pub constraint: Option<fn(u16) -> bool>,
    pub handler: InstrHandler,
}

impl std::fmt::Debug for InstrDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrDef")
            .field("pattern", &self.pattern)
            .field("mnemonic", &self.mnemonic)
            .field("clev", &self.clev)
            .finish_non_exhaustive()
    }
}

/// Decode information for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeEntry {
    pub mnemonic: Mnemonic,
    pub clev: u8,
    /// Representative opcode whose handler this opcode shares.
    pub handler: Option<u16>,
}

impl DecodeEntry {
    pub const ILLEGAL: Self = Self {
        mnemonic: Mnemonic::Illg,
        clev: 0,
        handler: None,
    };
}

/// The 65536-entry decode table.
#[derive(Debug, Clone)]
pub struct DecodeTable {
    entries: Box<[DecodeEntry]>,
    /// Representative opcode per definition, `None` if fully overridden.
    representatives: Vec<Option<u16>>,
}

impl Default for DecodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeTable {
    /// An empty table: every opcode is `Illg`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![DecodeEntry::ILLEGAL; 0x10000].into_boxed_slice(),
            representatives: Vec::new(),
        }
    }

    /// Read and merge a definition list.
    pub fn from_defs(defs: &[InstrDef]) -> Result<Self, TableError> {
        let patterns = defs
            .iter()
            .map(|def| Pattern::parse(def.pattern))
            .collect::<Result<Vec<_>, _>>()?;

        // Read: last matching definition owns the opcode.
        let mut owner: Vec<Option<u16>> = vec![None; 0x10000];
        for (idx, (def, &pattern)) in defs.iter().zip(&patterns).enumerate() {
            for opcode in pattern.opcodes() {
                if def.constraint.is_none_or(|f| f(opcode)) {
                    owner[opcode as usize] = Some(idx as u16);
                }
            }
        }

        // Merge: lowest owned opcode represents the definition.
        let mut representatives = vec![None; defs.len()];
        for (opcode, slot) in owner.iter().enumerate() {
            if let Some(idx) = *slot {
                representatives[idx as usize].get_or_insert(opcode as u16);
            }
        }

        let mut table = Self::new();
        for (opcode, slot) in owner.iter().enumerate() {
            if let Some(idx) = *slot {
                let def = &defs[idx as usize];
                table.entries[opcode] = DecodeEntry {
                    mnemonic: def.mnemonic,
                    clev: def.clev,
                    handler: if def.mnemonic == Mnemonic::Illg {
                        None
                    } else {
                        representatives[idx as usize]
                    },
                };
            }
        }
        table.representatives = representatives;
        Ok(table)
    }

    /// The compact descriptor list for the 68000: one handler per
    /// representative, skipping definitions for later CPU levels.
    #[must_use]
    pub fn descriptors(&self, defs: &[InstrDef]) -> Vec<OpDescriptor> {
        defs.iter()
            .zip(&self.representatives)
            .filter(|(def, _)| def.clev == 0 && def.mnemonic != Mnemonic::Illg)
            .filter_map(|(def, rep)| {
                rep.map(|opcode| OpDescriptor {
                    opcode,
                    mnemonic: def.mnemonic,
                    handler: def.handler,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn get(&self, opcode: u16) -> &DecodeEntry {
        &self.entries[opcode as usize]
    }

    /// Overwrite one entry. Generated tables and tests patch entries here.
    pub fn set(&mut self, opcode: u16, entry: DecodeEntry) {
        self.entries[opcode as usize] = entry;
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &DecodeEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(opcode, entry)| (opcode as u16, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeEntry, DecodeTable, InstrDef, Mnemonic, Pattern};
    use crate::cpu::Cpu68000;
    use crate::table::TableError;

    #[test]
    fn pattern_fixed_bits() {
        let p = Pattern::parse("0111rrr0dddddddd").unwrap();
        assert_eq!(p.mask, 0xF100);
        assert_eq!(p.bits, 0x7000);
        assert!(p.matches(0x7E42));
        assert!(!p.matches(0x7142));
    }

    #[test]
    fn opcode_enumeration_is_ascending_and_complete() {
        let p = Pattern::parse("0100111001110rrr").unwrap();
        let ops: Vec<u16> = p.opcodes().collect();
        assert_eq!(ops, (0x4E70..=0x4E77).collect::<Vec<_>>());
        assert_eq!(Pattern::parse("0111rrr0dddddddd").unwrap().opcodes().count(), 2048);
        assert_eq!(Pattern::parse("0100111001110001").unwrap().opcodes().count(), 1);
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert!(matches!(
            Pattern::parse("0111"),
            Err(TableError::BadPattern { pattern: "0111" })
        ));
        assert!(Pattern::parse("0111rrr0dddd_ddd").is_err());
    }

    fn dn_only(op: u16) -> bool {
        op & 0x0038 == 0
    }

    const DEFS: &[InstrDef] = &[
        InstrDef {
            pattern: "01000010ss000rrr",
            mnemonic: Mnemonic::Clr,
            clev: 0,
            constraint: None,
            handler: Cpu68000::op_clr,
        },
        InstrDef {
            pattern: "0100001011000rrr",
            mnemonic: Mnemonic::Illg,
            clev: 0,
            constraint: None,
            handler: Cpu68000::illegal_opcode,
        },
        InstrDef {
            pattern: "0100100111mmmrrr",
            mnemonic: Mnemonic::Extb,
            clev: 2,
            constraint: Some(dn_only),
            handler: Cpu68000::op_extb,
        },
    ];

    #[test]
    fn merge_redirects_to_lowest_opcode() {
        let table = DecodeTable::from_defs(DEFS).unwrap();
        let clr = table.get(0x4287);
        assert_eq!(clr.mnemonic, Mnemonic::Clr);
        assert_eq!(clr.handler, Some(0x4200));
        assert_eq!(table.get(0x4200).handler, Some(0x4200));
    }

    #[test]
    fn later_definitions_override_earlier() {
        let table = DecodeTable::from_defs(DEFS).unwrap();
        assert_eq!(*table.get(0x42C3), DecodeEntry::ILLEGAL);
        assert_eq!(table.get(0x4283).mnemonic, Mnemonic::Clr);
    }

    #[test]
    fn constraints_filter_operands() {
        let table = DecodeTable::from_defs(DEFS).unwrap();
        assert_eq!(table.get(0x49C2).mnemonic, Mnemonic::Extb);
        assert_eq!(table.get(0x49C2).clev, 2);
        assert_eq!(table.get(0x49D2).mnemonic, Mnemonic::Illg);
    }

    #[test]
    fn descriptors_skip_later_cpu_levels_and_illegal_entries() {
        let table = DecodeTable::from_defs(DEFS).unwrap();
        let descs = table.descriptors(DEFS);
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].opcode, 0x4200);
        assert_eq!(descs[0].mnemonic, Mnemonic::Clr);
    }
}
