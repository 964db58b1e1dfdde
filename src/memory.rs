use std::{fs, path::Path};

use log::debug;

use crate::{
    error::LoadError,
    registers::{IndexRegister, ProgramCounter},
};

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const FONT_ADDR: TypeAddr = 0x050;
pub const BIG_FONT_ADDR: TypeAddr = 0x0A0;
pub const STACK_DEPTH: usize = 16;

const ADDR_MASK: TypeAddr = 0x0FFF;

type FontBytes = [u8; 5 * 16];
type BigFontBytes = [u8; 10 * 16];

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

// 8x10 glyphs, only present on the extended machine
const BIG_FONT: BigFontBytes = [
    0xFF, 0xFF, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, // 0
    0x18, 0x78, 0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0xFF, 0xFF, // 1
    0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // 2
    0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 3
    0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0x03, 0x03, 0x03, 0x03, // 4
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 5
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, // 6
    0xFF, 0xFF, 0x03, 0x03, 0x06, 0x0C, 0x18, 0x18, 0x18, 0x18, // 7
    0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, // 8
    0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 9
    0x7E, 0xFF, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xC3, // A
    0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, // B
    0x3C, 0xFF, 0xC3, 0xC0, 0xC0, 0xC0, 0xC0, 0xC3, 0xFF, 0x3C, // C
    0xFC, 0xFE, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFE, 0xFC, // D
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // E
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xC0, 0xC0, // F
];

/// Address of the 5-byte glyph for a hex digit.
pub fn glyph_addr(digit: u8) -> TypeAddr {
    FONT_ADDR + (digit & 0xF) as TypeAddr * 5
}

/// Address of the 10-byte large glyph for a hex digit.
pub fn big_glyph_addr(digit: u8) -> TypeAddr {
    BIG_FONT_ADDR + (digit & 0xF) as TypeAddr * 10
}

/// Reads a program image and checks it fits above 0x200.
pub fn read_program(path: &Path) -> Result<Vec<u8>, LoadError> {
    let program = fs::read(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    check_program_size(&program)?;
    Ok(program)
}

pub fn check_program_size(program: &[u8]) -> Result<(), LoadError> {
    if program.len() > MAX_PROGRAM_SIZE {
        return Err(LoadError::TooLarge {
            size: program.len(),
            max: MAX_PROGRAM_SIZE,
        });
    }
    Ok(())
}

pub struct Memory {
    // 4k bytes
    // font data stored from 050 -> 09F, big font from 0A0 -> 13F
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Memory {
    pub fn new(big_font: bool) -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0x0),
            stack: Stack::new(),
        };
        mem.write(FONT_ADDR, &DEFAULT_FONT);
        if big_font {
            mem.write(BIG_FONT_ADDR, &BIG_FONT);
        }
        mem
    }

    // addresses wrap at 4 KiB so a stray index can never leave the address space
    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    pub fn write(&mut self, addr: TypeAddr, data: &[u8]) {
        for (offset, byte) in data.iter().enumerate() {
            self.set(addr.wrapping_add(offset as TypeAddr), *byte);
        }
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    /// Reads the big-endian instruction word at PC and steps past it.
    pub fn next_instruction(&mut self) -> u16 {
        let (l, r) = (self.get(self.pc.0), self.get(self.pc.0.wrapping_add(1)));
        self.increment_pc();
        ((l as u16) << 8) | r as u16
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    // loads program instructions starting at address 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        check_program_size(bytes)?;
        let start = PROGRAM_START as usize;
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        debug!("loaded {} byte program at {:#05x}", bytes.len(), start);
        Ok(())
    }
}

pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    /// False when all 16 slots are taken; the stack is left unchanged.
    pub fn push(&mut self, addr: TypeAddr) -> bool {
        if self.sp == STACK_DEPTH {
            return false;
        }
        self.addresses[self.sp] = addr;
        self.sp += 1;
        true
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.addresses[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_zeroed_outside_font() {
        let mem = Memory::new(false);
        assert!(mem.bytes[..FONT_ADDR as usize].iter().all(|b| *b == 0));
        assert_eq!(&mem.bytes[0x050..0x0A0], &DEFAULT_FONT[..]);
        assert!(mem.bytes[0x0A0..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_big_font_only_when_asked() {
        let mem = Memory::new(true);
        assert_eq!(&mem.bytes[0x0A0..0x140], &BIG_FONT[..]);
        assert!(mem.bytes[0x140..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_load_rom_and_fetch() {
        let mut mem = Memory::new(false);
        mem.load_rom(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(mem.next_instruction(), 0x00E0);
        assert_eq!(mem.next_instruction(), 0x1200);
        assert_eq!(mem.pc.0, 0x204);
    }

    #[test]
    fn test_load_rom_limits() {
        let mut mem = Memory::new(false);
        assert!(mem.load_rom(&vec![0xAA; MAX_PROGRAM_SIZE]).is_ok());
        assert_eq!(mem.get(0xFFF), 0xAA);
        assert!(matches!(
            mem.load_rom(&vec![0; MAX_PROGRAM_SIZE + 1]),
            Err(LoadError::TooLarge { size: 3585, max: 3584 })
        ));
    }

    #[test]
    fn test_addresses_wrap() {
        let mut mem = Memory::new(false);
        mem.set(0x1005, 7);
        assert_eq!(mem.get(0x005), 7);
        mem.set_pc(0xFFF);
        mem.set(0xFFF, 0x12);
        mem.set(0x000, 0x34);
        assert_eq!(mem.next_instruction(), 0x1234);
    }

    #[test]
    fn test_glyph_addresses() {
        assert_eq!(glyph_addr(0), 0x050);
        assert_eq!(glyph_addr(0xF), 0x050 + 75);
        assert_eq!(big_glyph_addr(0), 0x0A0);
        assert_eq!(big_glyph_addr(9), 0x0A0 + 90);
    }

    #[test]
    fn test_stack_bounds() {
        let mut stack = Stack::new();
        for addr in 0..STACK_DEPTH as TypeAddr {
            assert!(stack.push(0x200 + addr * 2));
        }
        assert!(!stack.push(0x300));
        assert_eq!(stack.depth(), 16);
        assert_eq!(stack.pop(), Some(0x21E));
        for _ in 0..15 {
            stack.pop().unwrap();
        }
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 0);
    }
}
