use std::{fs, path::PathBuf};

use chip8vm::{Emulator, Flow, LoadError, Variant};
use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

// the directory is removed when the returned guard drops
fn scratch_rom(bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("program.ch8");
    fs::write(&path, bytes).unwrap();
    (dir, path)
}

fn lit(emu: &Emulator) -> Vec<(usize, usize)> {
    let fb = &emu.fb;
    (0..fb.height())
        .flat_map(|y| (0..fb.width()).map(move |x| (x, y)))
        .filter(|(x, y)| fb.get(*x, *y))
        .collect()
}

#[test]
fn draws_a_bar_and_idles() {
    let program = [
        0xA2, 0x08, // LD I, 0x208
        0x60, 0x00, // LD V0, 0
        0xD0, 0x01, // DRW V0, V0, 1
        0x12, 0x06, // JP 0x206
        0xFF, // sprite
    ];
    for variant in [Variant::Base, Variant::Extended] {
        let mut emu = Emulator::from_rom(variant, &program, Some(0)).unwrap();
        for _ in 0..3 {
            assert_eq!(emu.step().unwrap(), Flow::Continue);
        }
        let expected: Vec<(usize, usize)> = (0..8).map(|x| (x, 0)).collect();
        assert_eq!(lit(&emu), expected);

        for _ in 0..200 {
            emu.step().unwrap();
            emu.tick_timers();
        }
        assert_eq!(emu.mem.pc.0, 0x206);
        assert_eq!(lit(&emu), expected);
    }
}

#[test]
fn oversized_program_is_rejected() {
    let (_dir, path) = scratch_rom(&vec![0x12; 3585]);
    let result = Emulator::from_file(Variant::Base, &path, None);
    assert!(matches!(
        result,
        Err(LoadError::TooLarge { size: 3585, max: 3584 })
    ));
}

#[test]
fn largest_program_loads_from_file() {
    let (_dir, path) = scratch_rom(&vec![0x12; 3584]);
    let emu = Emulator::from_file(Variant::Extended, &path, None).unwrap();
    assert_eq!(emu.mem.get(0xFFF), 0x12);
}

#[test]
fn missing_program_is_unreadable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.ch8");
    match Emulator::from_file(Variant::Base, &path, None) {
        Err(LoadError::Unreadable { path: reported, .. }) => assert_eq!(reported, path),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("loaded a program that does not exist"),
    }
}

#[test]
fn register_block_survives_a_second_machine() {
    // store V0..V3 from one machine, load them in another given the same bytes
    let mut first = Emulator::with_seed(Variant::Base, 1);
    for reg in 0..4 {
        first.regs.set_register(reg, 0xC0 | reg);
    }
    first.mem.set_index(0x500);
    first.execute_ins(chip8vm::OpCodes::StoreRegisterToMemory(3)).unwrap();
    assert_eq!(first.mem.index.0, 0x504);

    let mut second = Emulator::with_seed(Variant::Base, 2);
    for offset in 0..4 {
        second.mem.set(0x500 + offset, first.mem.get(0x500 + offset));
    }
    second.mem.set_index(0x500);
    second.execute_ins(chip8vm::OpCodes::LoadRegisterFromMemory(3)).unwrap();
    for reg in 0..4 {
        assert_eq!(second.regs.get(reg), 0xC0 | reg);
    }
    assert_eq!(second.mem.index.0, 0x504);
}

#[test]
fn superchip_program_exits() {
    let program = [
        0x00, 0xFF, // HIGH
        0x60, 0x05, // LD V0, 5
        0xF0, 0x30, // LD HF, V0
        0xD0, 0x0A, // DRW V0, V0, 10
        0x00, 0xFD, // EXIT
    ];
    let mut emu = Emulator::from_rom(Variant::Extended, &program, None).unwrap();
    let mut steps = 0;
    while emu.step().unwrap() == Flow::Continue {
        steps += 1;
    }
    assert_eq!(steps, 4);
    assert!(emu.is_hires());
    assert_eq!(emu.fb.width(), 128);
    // top row of the large 5 is a full byte
    assert!((5..13).all(|x| emu.fb.get(x, 5)));
}

#[test]
fn countdown_with_delay_timer() {
    let program = [
        0x60, 0x03, // LD V0, 3
        0xF0, 0x15, // LD DT, V0
        0xF1, 0x07, // LD V1, DT
        0x31, 0x00, // SE V1, 0
        0x12, 0x04, // JP 0x204
        0x12, 0x0A, // JP 0x20A
    ];
    let mut emu = Emulator::from_rom(Variant::Base, &program, None).unwrap();
    for _ in 0..100 {
        emu.step().unwrap();
        if emu.mem.pc.0 == 0x204 {
            emu.tick_timers();
        }
    }
    assert_eq!(emu.mem.pc.0, 0x20A);
    assert_eq!(emu.timers.delay.count, 0);
}
