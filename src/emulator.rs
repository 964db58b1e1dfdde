use std::path::Path;

use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    decode::{Instruction, OpCodes},
    display::FrameBuffer,
    error::{LoadError, MachineError},
    keyboard::Keypad,
    memory::{self, big_glyph_addr, glyph_addr, Memory, TypeAddr, PROGRAM_START},
    registers::{Registers, RplFlags, VF},
    timer::Timers,
    variant::Variant,
};

/// What the driver should do after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// 00FD: the program asked the host to terminate.
    Exit,
}

// FX0A remembers the first key seen down, keyed by the address of the
// waiting instruction so a latch never leaks into another FX0A
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyLatch {
    addr: TypeAddr,
    key: u8,
}

pub struct Emulator {
    pub regs: Registers,
    pub mem: Memory,
    pub fb: FrameBuffer,
    pub timers: Timers,
    pub keypad: Keypad,
    rpl: RplFlags,
    variant: Variant,
    rng: StdRng,
    key_latch: Option<KeyLatch>,
}

impl Emulator {
    pub fn new(variant: Variant) -> Self {
        Self::with_rng(variant, StdRng::from_entropy())
    }

    /// Deterministic CXNN, for tests and replays.
    pub fn with_seed(variant: Variant, seed: u64) -> Self {
        Self::with_rng(variant, StdRng::seed_from_u64(seed))
    }

    fn with_rng(variant: Variant, rng: StdRng) -> Self {
        let (width, height) = variant.lores();
        Self {
            regs: Registers::new(),
            mem: Memory::new(variant.has_extended_opcodes()),
            fb: FrameBuffer::new(width, height),
            timers: Timers::new(),
            keypad: Keypad::new(),
            rpl: RplFlags::new(),
            variant,
            rng,
            key_latch: None,
        }
    }

    /// Builds a machine with `program` at 0x200. Oversized programs are
    /// rejected before any state exists.
    pub fn from_rom(variant: Variant, program: &[u8], seed: Option<u64>) -> Result<Self, LoadError> {
        memory::check_program_size(program)?;
        let mut emu = match seed {
            Some(seed) => Self::with_seed(variant, seed),
            None => Self::new(variant),
        };
        emu.mem.load_rom(program)?;
        Ok(emu)
    }

    pub fn from_file(variant: Variant, path: &Path, seed: Option<u64>) -> Result<Self, LoadError> {
        let program = memory::read_program(path)?;
        Self::from_rom(variant, &program, seed)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn rpl(&self) -> &RplFlags {
        &self.rpl
    }

    pub fn is_hires(&self) -> bool {
        (self.fb.width(), self.fb.height()) != self.variant.lores()
    }

    /// Back to power-on state with the program still in memory. RPL flags
    /// survive.
    pub fn reset(&mut self) {
        let (width, height) = self.variant.lores();
        self.regs.reset();
        self.mem.set_pc(PROGRAM_START);
        self.mem.set_index(0);
        self.mem.stack = Default::default();
        self.fb = FrameBuffer::new(width, height);
        self.timers.reset();
        self.key_latch = None;
    }

    pub fn fetch(&mut self) -> Instruction {
        Instruction::decode(self.mem.next_instruction())
    }

    pub fn fetch_decode(&mut self) -> OpCodes {
        let ins = self.fetch();
        OpCodes::from_instruction(&ins, self.variant)
    }

    /// One fetch-decode-execute cycle.
    pub fn step(&mut self) -> Result<Flow, MachineError> {
        let operation = self.fetch_decode();
        self.execute_ins(operation)
    }

    /// One 60 Hz timer step; true on the tone-off edge.
    pub fn tick_timers(&mut self) -> bool {
        let stopped = self.timers.tick();
        if stopped {
            debug!("tone off");
        }
        stopped
    }

    // PC has already moved past the instruction being executed
    fn current_addr(&self) -> TypeAddr {
        self.mem.pc.0.wrapping_sub(2)
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.mem.increment_pc();
        }
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<Flow, MachineError> {
        match ins {
            OpCodes::ClearScreen => self.fb.clear_buffer(),
            OpCodes::PopSubroutine => {
                let addr = self.mem.stack.pop().ok_or(MachineError::StackUnderflow)?;
                self.mem.set_pc(addr);
            }
            OpCodes::MachineCall(addr) => {
                if addr != 0 {
                    warn!(
                        "unimplemented machine code call {:#05x} at {:#05x}",
                        addr,
                        self.current_addr()
                    );
                }
            }
            OpCodes::Jump(addr) => self.mem.set_pc(addr),
            OpCodes::PushSubroutine(addr) => {
                // store the return address, already past this instruction
                if !self.mem.stack.push(self.mem.pc.0) {
                    return Err(MachineError::StackOverflow { target: addr });
                }
                self.mem.set_pc(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) == nn),
            OpCodes::SkipNotEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) != nn),
            OpCodes::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) == self.regs.get(vy))
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) != self.regs.get(vy))
            }
            OpCodes::SetRegister(vx, nn) => self.regs.set_register(vx, nn),
            OpCodes::AddToRegister(vx, nn) => self.regs.add_to_register(vx, nn),
            OpCodes::CopyRegister(vx, vy) => self.regs.set_register(vx, self.regs.get(vy)),
            OpCodes::Or(vx, vy) => self.logic(vx, vy, |x, y| x | y),
            OpCodes::And(vx, vy) => self.logic(vx, vy, |x, y| x & y),
            OpCodes::XOr(vx, vy) => self.logic(vx, vy, |x, y| x ^ y),
            OpCodes::Add(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                let (z, carry) = x.overflowing_add(y);
                self.regs.set_register(vx, z);
                self.regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x >= y); // no borrow
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y >= x); // no borrow
            }
            OpCodes::RightShift(vx, vy) => {
                let value = self.shift_source(vx, vy);
                self.regs.set_register(vx, value >> 1);
                self.regs.set_register(VF, value & 1);
            }
            OpCodes::LeftShift(vx, vy) => {
                let value = self.shift_source(vx, vy);
                self.regs.set_register(vx, value << 1);
                self.regs.set_register(VF, (value >> 7) & 1);
            }
            OpCodes::SetIndexRegister(addr) => self.mem.set_index(addr),
            OpCodes::JumpWithOffset(reg, addr) => {
                let offset = self.regs.get(reg);
                self.mem.set_pc(addr.wrapping_add(offset as TypeAddr));
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(vx, vy, height) => {
                // From I to I + N, plot I at VX, VY
                let sprite: Vec<u8> = (0..height as TypeAddr)
                    .map(|row| self.mem.get(self.mem.index.0.wrapping_add(row)))
                    .collect();
                self.regs.set_flag(false);
                let vf = self.fb.paint(self.regs.get(vx), self.regs.get(vy), &sprite);
                self.regs.set_flag(vf);
            }
            OpCodes::SkipIfPressed(vx) => {
                self.skip_if(self.keypad.get_key_status_from_num(self.regs.get(vx)))
            }
            OpCodes::SkipIfNotPressed(vx) => {
                self.skip_if(!self.keypad.get_key_status_from_num(self.regs.get(vx)))
            }
            OpCodes::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.timers.delay.count)
            }
            OpCodes::GetKey(vx) => self.wait_for_key(vx),
            OpCodes::CopyRegisterToDelay(vx) => self.timers.delay.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => {
                if self.timers.start_tone(self.regs.get(vx)) {
                    debug!("tone on");
                }
            }
            OpCodes::AddToIndex(vx) => self.mem.index.advance(self.regs.get(vx) as TypeAddr),
            OpCodes::PointChar(vx) => self.mem.set_index(glyph_addr(self.regs.get(vx))),
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                self.mem.write(self.mem.index.0, &digits);
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                for reg in 0..=vx {
                    let addr = self.mem.index.0.wrapping_add(reg as TypeAddr);
                    self.mem.set(addr, self.regs.get(reg));
                }
                self.after_transfer(vx);
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                for reg in 0..=vx {
                    let addr = self.mem.index.0.wrapping_add(reg as TypeAddr);
                    self.regs.set_register(reg, self.mem.get(addr));
                }
                self.after_transfer(vx);
            }
            OpCodes::ScrollDown(n) => self.fb.scroll_down(n),
            OpCodes::ScrollRight => self.fb.scroll_right(),
            OpCodes::ScrollLeft => self.fb.scroll_left(),
            OpCodes::Exit => return Ok(Flow::Exit),
            OpCodes::LowRes => self.set_resolution(self.variant.lores()),
            OpCodes::HighRes => self.set_resolution(self.variant.hires()),
            OpCodes::DisplayWide(vx, vy) => {
                let mut sprite = [0u8; 32];
                for (row, byte) in sprite.iter_mut().enumerate() {
                    *byte = self.mem.get(self.mem.index.0.wrapping_add(row as TypeAddr));
                }
                self.regs.set_flag(false);
                let vf = self.fb.paint_wide(self.regs.get(vx), self.regs.get(vy), &sprite);
                self.regs.set_flag(vf);
            }
            OpCodes::PointBigChar(vx) => self.mem.set_index(big_glyph_addr(self.regs.get(vx))),
            OpCodes::StoreFlags(vx) => self.rpl.store(&self.regs, vx),
            OpCodes::LoadFlags(vx) => self.rpl.load(&mut self.regs, vx),
            OpCodes::Unimplemented(word) => {
                warn!(
                    "unknown instruction {:#06x} at {:#05x}",
                    word,
                    self.current_addr()
                );
            }
        }
        Ok(Flow::Continue)
    }

    fn logic(&mut self, vx: u8, vy: u8, op: impl Fn(u8, u8) -> u8) {
        let value = op(self.regs.get(vx), self.regs.get(vy));
        self.regs.set_register(vx, value);
        if self.variant.logic_resets_flag() {
            self.regs.set_flag(false);
        }
    }

    fn shift_source(&mut self, vx: u8, vy: u8) -> u8 {
        if self.variant.shift_reads_vy() {
            self.regs.set_register(vx, self.regs.get(vy));
        }
        self.regs.get(vx)
    }

    fn after_transfer(&mut self, vx: u8) {
        if self.variant.transfer_advances_index() {
            self.mem.index.advance(vx as TypeAddr + 1);
        }
    }

    fn set_resolution(&mut self, (width, height): (usize, usize)) {
        debug!("resolution set to {}x{}", width, height);
        self.fb = FrameBuffer::new(width, height);
    }

    // completes only once the latched key is released; until then the
    // instruction is re-fetched
    fn wait_for_key(&mut self, vx: u8) {
        let addr = self.current_addr();
        let latch = self.key_latch.filter(|latch| latch.addr == addr);
        match latch {
            Some(KeyLatch { key, .. }) if !self.keypad.get_key_status_from_num(key) => {
                self.regs.set_register(vx, key);
                self.key_latch = None;
                return;
            }
            Some(_) => {}
            None => {
                self.key_latch = self.keypad.first_pressed().map(|key| KeyLatch { addr, key });
            }
        }
        self.mem.pc.decrement();
    }
}
