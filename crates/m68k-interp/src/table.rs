//! Opcode dispatch table.
//!
//! Every one of the 65536 opcodes maps to a handler. Construction follows
//! the decode table:
//!
//! 1. every slot starts at the illegal-instruction handler
//! 2. each descriptor installs its handler at its representative opcode
//! 3. each opcode that decodes to a 68000 instruction copies the handler of
//!    its representative
//!
//! A redirect whose target slot was never installed means the descriptor
//! list and the decode table disagree. That is a build-time defect, reported
//! as [`TableError::UnregisteredRedirect`].
//!
//! The finished table is immutable and can be shared between cores.

use thiserror::Error;

use crate::bus::M68kBus;
use crate::cpu::Cpu68000;
use crate::decode::{DecodeTable, Mnemonic};
use crate::isa;

/// Handler signature: executes one instruction and returns its cost in
/// (unscaled) CPU cycles.
pub type InstrHandler = fn(&mut Cpu68000, &mut dyn M68kBus, u16) -> i32;

/// Index into [`DispatchTable`]'s handler list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u16);

impl HandlerId {
    /// The illegal-instruction handler.
    pub const ILLEGAL: Self = Self(0);
}

/// One installable handler, keyed by its representative opcode.
#[derive(Clone, Copy)]
pub struct OpDescriptor {
    pub opcode: u16,
    pub mnemonic: Mnemonic,
    pub handler: InstrHandler,
}

impl std::fmt::Debug for OpDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpDescriptor({:#06X} {})", self.opcode, self.mnemonic.name())
    }
}

/// Table construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("opcode {opcode:#06X} redirects to {target:#06X}, which has no handler installed")]
    UnregisteredRedirect { opcode: u16, target: u16 },
    #[error("malformed opcode pattern {pattern:?}")]
    BadPattern { pattern: &'static str },
}

/// Maps every opcode to its handler.
pub struct DispatchTable {
    slots: Box<[HandlerId]>,
    handlers: Vec<InstrHandler>,
    mnemonics: Vec<Mnemonic>,
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("handlers", &self.handlers.len())
            .field("valid_opcodes", &self.valid_opcode_count())
            .finish()
    }
}

impl DispatchTable {
    /// Build from a descriptor list and the decode table it was derived from.
    pub fn try_build(
        descriptors: &[OpDescriptor],
        decode: &DecodeTable,
    ) -> Result<Self, TableError> {
        let mut table = Self {
            slots: vec![HandlerId::ILLEGAL; 0x10000].into_boxed_slice(),
            handlers: vec![Cpu68000::illegal_opcode as InstrHandler],
            mnemonics: vec![Mnemonic::Illg],
        };

        for desc in descriptors {
            let id = HandlerId(table.handlers.len() as u16);
            table.handlers.push(desc.handler);
            table.mnemonics.push(desc.mnemonic);
            table.slots[desc.opcode as usize] = id;
        }

        for (opcode, entry) in decode.iter() {
            if entry.mnemonic == Mnemonic::Illg || entry.clev != 0 {
                continue;
            }
            let Some(target) = entry.handler else {
                continue;
            };
            let id = table.slots[target as usize];
            if id == HandlerId::ILLEGAL {
                return Err(TableError::UnregisteredRedirect { opcode, target });
            }
            table.slots[opcode as usize] = id;
        }

        Ok(table)
    }

    /// Build, treating inconsistent inputs as a fatal defect.
    ///
    /// # Panics
    ///
    /// Panics if a redirect targets an opcode no descriptor installed.
    #[must_use]
    pub fn build(descriptors: &[OpDescriptor], decode: &DecodeTable) -> Self {
        match Self::try_build(descriptors, decode) {
            Ok(table) => table,
            Err(e) => panic!("68000 dispatch table: {e}"),
        }
    }

    /// The table for the built-in 68000 instruction set.
    ///
    /// # Panics
    ///
    /// Panics if the built-in definitions are inconsistent.
    #[must_use]
    pub fn baseline() -> Self {
        let decode = match DecodeTable::from_defs(isa::DEFS) {
            Ok(decode) => decode,
            Err(e) => panic!("68000 decode table: {e}"),
        };
        Self::build(&decode.descriptors(isa::DEFS), &decode)
    }

    /// The handler for `opcode`.
    #[inline]
    #[must_use]
    pub fn handler(&self, opcode: u16) -> InstrHandler {
        self.handlers[self.slots[opcode as usize].0 as usize]
    }

    #[must_use]
    pub fn handler_id(&self, opcode: u16) -> HandlerId {
        self.slots[opcode as usize]
    }

    #[must_use]
    pub fn mnemonic(&self, opcode: u16) -> Mnemonic {
        self.mnemonics[self.slots[opcode as usize].0 as usize]
    }

    /// True if `opcode` dispatches to something other than the illegal
    /// handler.
    #[must_use]
    pub fn is_valid(&self, opcode: u16) -> bool {
        self.slots[opcode as usize] != HandlerId::ILLEGAL
    }

    /// Installed handlers, including the illegal handler.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn valid_opcode_count(&self) -> usize {
        self.slots.iter().filter(|id| **id != HandlerId::ILLEGAL).count()
    }
}
