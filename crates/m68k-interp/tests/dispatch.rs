//! Dispatch table construction and opcode validity.

mod common;

use std::sync::Arc;

use common::{boot, step, TestBus, RESET_PC, RESET_SSP};
use m68k_interp::exceptions::ILLEGAL_OPCODE_CYCLES;
use m68k_interp::{
    Cpu68000, DecodeEntry, DecodeTable, DispatchTable, HandlerId, InstrDef, M68kBus, Mnemonic,
    Register, TableError,
};

#[test]
fn line_a_and_line_f_are_never_valid() {
    let table = DispatchTable::baseline();
    for low in 0..0x1000u16 {
        assert!(!table.is_valid(0xA000 | low));
        assert!(!table.is_valid(0xF000 | low));
    }
}

#[test]
fn redirected_opcodes_share_one_handler() {
    let table = DispatchTable::baseline();
    let moveq = table.handler_id(0x7000);
    for opcode in (0x7000..=0x7FFFu16).filter(|op| op & 0x0100 == 0) {
        assert_eq!(table.handler_id(opcode), moveq, "{opcode:#06X}");
    }
    // Bit 8 set in group 7 is not MOVEQ.
    assert_eq!(table.handler_id(0x7100), HandlerId::ILLEGAL);
}

#[test]
fn valid_opcode_count_matches_decode_table() {
    let decode = DecodeTable::from_defs(m68k_interp::isa::DEFS).unwrap();
    let expected = decode
        .iter()
        .filter(|(_, e)| e.mnemonic != Mnemonic::Illg && e.clev == 0)
        .count();
    let table = DispatchTable::baseline();
    assert_eq!(table.valid_opcode_count(), expected);
    // One handler per 68000 definition plus the illegal handler.
    assert_eq!(table.handler_count(), decode.descriptors(m68k_interp::isa::DEFS).len() + 1);
}

#[test]
fn explicit_illegal_and_68020_encodings_trap() {
    let cpu = Cpu68000::new();
    assert!(!cpu.is_valid_instruction(0x4AFC));
    for reg in 0..8 {
        assert!(!cpu.is_valid_instruction(0x49C0 | reg));
    }
    assert!(cpu.is_valid_instruction(0x4840));
}

#[test]
fn inconsistent_descriptor_list_is_rejected() {
    let mut decode = DecodeTable::from_defs(m68k_interp::isa::DEFS).unwrap();
    // A group nobody installed a handler for.
    decode.set(
        0x4E76,
        DecodeEntry {
            mnemonic: Mnemonic::Trap,
            clev: 0,
            handler: Some(0x4E77),
        },
    );
    let descriptors = decode.descriptors(m68k_interp::isa::DEFS);
    assert_eq!(
        DispatchTable::try_build(&descriptors, &decode).unwrap_err(),
        TableError::UnregisteredRedirect {
            opcode: 0x4E76,
            target: 0x4E77,
        }
    );
}

#[test]
fn malformed_definition_is_rejected() {
    let bad = [InstrDef {
        pattern: "01001110011100",
        ..m68k_interp::isa::DEFS[0]
    }];
    assert!(matches!(
        DecodeTable::from_defs(&bad),
        Err(TableError::BadPattern { .. })
    ));
}

#[test]
fn cores_can_share_one_table() {
    let table = Arc::new(DispatchTable::baseline());
    let mut a = Cpu68000::with_table(Arc::clone(&table));
    let mut b = Cpu68000::with_table(Arc::clone(&table));
    assert_eq!(Arc::strong_count(&table), 3);

    let mut bus_a = TestBus::new();
    bus_a.write_long(4, 0x1000);
    bus_a.load_words(0x1000, &[0x7005]);
    let mut bus_b = TestBus::new();
    bus_b.write_long(4, 0x2000);
    bus_b.load_words(0x2000, &[0x72FB]);

    a.pulse_reset(&mut bus_a);
    b.pulse_reset(&mut bus_b);
    step(&mut a, &mut bus_a);
    step(&mut b, &mut bus_b);
    assert_eq!(a.get(Register::D0), 5);
    assert_eq!(b.get(Register::D1), 0xFFFF_FFFB);
    assert_eq!(Arc::strong_count(&table), 3);
}

#[test]
fn table_is_built_lazily_on_reset() {
    let (cpu, _bus) = boot(&[0x4E71]);
    assert!(cpu.table().is_valid(0x4E71));
    assert_eq!(cpu.table().mnemonic(0x4E75), Mnemonic::Rts);
}

#[test]
fn validity_agrees_with_dispatch_for_every_opcode() {
    // Handlers for illegal instruction, line A and line F, far from
    // anywhere a zero operand can branch to.
    const TRAPS: [(u32, u32); 3] = [(4, 0x00A0_0400), (10, 0x00A0_0A00), (11, 0x00A0_0B00)];

    let (mut cpu, mut bus) = boot(&[]);
    for opcode in 0..=0xFFFFu16 {
        // MOVE to (0).L may have clobbered the reset vectors.
        bus.write_long(0, RESET_SSP);
        bus.write_long(4, RESET_PC);
        for (vector, handler) in TRAPS {
            bus.set_vector(vector, handler);
        }
        bus.write_long(RESET_SSP - 4, 0);
        bus.load_words(RESET_PC, &[opcode, 0, 0, 0]);
        cpu.pulse_reset(&mut bus);

        let cycles = step(&mut cpu, &mut bus);
        let pc = cpu.get(Register::Pc);
        let trapped = cycles == ILLEGAL_OPCODE_CYCLES
            && TRAPS.iter().any(|&(_, handler)| handler == pc)
            && bus.peek_long(RESET_SSP - 4) == RESET_PC;
        assert_eq!(
            cpu.is_valid_instruction(opcode),
            !trapped,
            "{opcode:#06X}: {cycles} cycles, PC {pc:#010X}"
        );
        if trapped {
            let vector = match opcode >> 12 {
                0xA => 10,
                0xF => 11,
                _ => 4,
            };
            assert_eq!(bus.peek_long(vector * 4), pc, "{opcode:#06X}");
        }
    }
}
