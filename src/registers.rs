// 16 8-bit data registers named V0 to VF
// VF doubles as the carry/borrow/collision flag
// I -> address register
// RPL -> 8 persistent user flags on the extended machine

use crate::memory::TypeAddr;

pub const VF: u8 = 0xF;
pub const RPL_FLAGS: usize = 8;

#[derive(Debug, Default)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    // 7XNN never touches VF
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn set_flag(&mut self, value: bool) {
        self.set_register(VF, value as u8);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn reset(&mut self) {
        self.registers = [0; 16];
    }
}

/// Survives `Registers::reset`; only FX75/FX85 reach it.
#[derive(Debug, Default)]
pub struct RplFlags {
    flags: [u8; RPL_FLAGS],
}

impl RplFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies V0..=Vx into the flags, x clamped to 7.
    pub fn store(&mut self, regs: &Registers, x: u8) {
        for reg in 0..=x.min(RPL_FLAGS as u8 - 1) {
            self.flags[reg as usize] = regs.get(reg);
        }
    }

    /// Copies the flags back into V0..=Vx, x clamped to 7.
    pub fn load(&self, regs: &mut Registers, x: u8) {
        for reg in 0..=x.min(RPL_FLAGS as u8 - 1) {
            regs.set_register(reg, self.flags[reg as usize]);
        }
    }

    pub fn get(&self, slot: usize) -> Option<u8> {
        self.flags.get(slot).copied()
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn advance(&mut self, by: TypeAddr) {
        self.0 = self.0.wrapping_add(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps_without_flag() {
        let mut regs = Registers::new();
        regs.set_register(3, 0xFF);
        regs.set_register(VF, 0x42);
        regs.add_to_register(3, 2);
        assert_eq!(regs.get(3), 1);
        assert_eq!(regs.get(VF), 0x42);
    }

    #[test]
    fn test_rpl_clamps_to_eight() {
        let mut regs = Registers::new();
        for reg in 0..16 {
            regs.set_register(reg, reg + 1);
        }
        let mut rpl = RplFlags::new();
        rpl.store(&regs, 0xF);
        assert_eq!(rpl.get(7), Some(8));
        assert_eq!(rpl.get(8), None);

        regs.reset();
        rpl.load(&mut regs, 0xF);
        assert_eq!(regs.get(7), 8);
        assert_eq!(regs.get(8), 0);
    }

    #[test]
    fn test_rpl_store_is_inclusive() {
        let mut regs = Registers::new();
        regs.set_register(0, 10);
        regs.set_register(1, 11);
        regs.set_register(2, 12);
        let mut rpl = RplFlags::new();
        rpl.store(&regs, 1);
        assert_eq!(rpl.get(0), Some(10));
        assert_eq!(rpl.get(1), Some(11));
        assert_eq!(rpl.get(2), Some(0));
    }
}
