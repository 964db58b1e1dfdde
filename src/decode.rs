use crate::{memory::TypeAddr, variant::Variant};

// n is starting digit, m is length
fn nth_m_digits(code: u16, n: u8, m: u8) -> u16 {
    // 0110 1100 1111 0001
    // -------------------
    // 1111 1111 1111 1111
    //      1111 1111 1111
    //           1111 1111
    //                1111
    let shift_places = (4 - m - (n - 1)) * 4;
    let mask = (1u32 << (m as u32 * 4)) - 1;
    (code & ((mask as u16) << shift_places)) >> shift_places
}

/// Operand fields of one instruction word. Every word decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: TypeAddr,
}

impl Instruction {
    pub fn decode(code: u16) -> Self {
        Self {
            opcode: nth_m_digits(code, 1, 1) as u8,
            x: nth_m_digits(code, 2, 1) as u8,
            y: nth_m_digits(code, 3, 1) as u8,
            n: nth_m_digits(code, 4, 1) as u8,
            nn: nth_m_digits(code, 3, 2) as u8,
            nnn: nth_m_digits(code, 2, 3),
        }
    }

    pub fn word(&self) -> u16 {
        ((self.opcode as u16) << 12) | self.nnn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 0NNN
    // machine code routine on the original hardware, never executed
    MachineCall(TypeAddr),
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, VF untouched
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    // jump to NNN plus the register named here: V0, or VX on the extended machine
    JumpWithOffset(u8, TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at Coordinates (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    // extended machine only
    // 00CN
    ScrollDown(u8),
    // 00FB
    ScrollRight,
    // 00FC
    ScrollLeft,
    // 00FD
    Exit,
    // 00FE
    LowRes,
    // 00FF
    HighRes,
    // DXY0
    DisplayWide(u8, u8),
    // FX30
    PointBigChar(u8),
    // FX75
    StoreFlags(u8),
    // FX85
    LoadFlags(u8),

    Unimplemented(u16),
}

impl OpCodes {
    pub fn decode_raw(ins: u16, variant: Variant) -> Self {
        Self::from_instruction(&Instruction::decode(ins), variant)
    }

    pub fn from_instruction(ins: &Instruction, variant: Variant) -> Self {
        if variant.has_extended_opcodes() {
            if let Some(op) = Self::extended(ins) {
                return op;
            }
        }
        Self::base(ins, variant)
    }

    fn extended(ins: &Instruction) -> Option<Self> {
        let Instruction { opcode, x, y, n, nn, .. } = *ins;
        let op = match (opcode, x, y, n) {
            (0x0, 0x0, 0xC, n) => Self::ScrollDown(n),
            (0x0, 0x0, 0xF, 0xB) => Self::ScrollRight,
            (0x0, 0x0, 0xF, 0xC) => Self::ScrollLeft,
            (0x0, 0x0, 0xF, 0xD) => Self::Exit,
            (0x0, 0x0, 0xF, 0xE) => Self::LowRes,
            (0x0, 0x0, 0xF, 0xF) => Self::HighRes,
            (0xD, x, y, 0x0) => Self::DisplayWide(x, y),
            (0xF, x, _, _) => match nn {
                0x30 => Self::PointBigChar(x),
                0x75 => Self::StoreFlags(x),
                0x85 => Self::LoadFlags(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(op)
    }

    fn base(ins: &Instruction, variant: Variant) -> Self {
        let Instruction {
            opcode,
            x,
            y,
            n,
            nn,
            nnn,
        } = *ins;

        match opcode {
            0x0 => match nnn {
                0x0E0 => Self::ClearScreen,
                0x0EE => Self::PopSubroutine,
                _ => Self::MachineCall(nnn),
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::PushSubroutine(nnn),
            0x3 => Self::SkipEqualConstant(x, nn),
            0x4 => Self::SkipNotEqualConstant(x, nn),
            0x5 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, nn),
            0x7 => Self::AddToRegister(x, nn),
            0x8 => match n {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unimplemented(ins.word()),
            },
            0x9 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(nnn),
            0xB => Self::JumpWithOffset(variant.jump_offset_register(x), nnn),
            0xC => Self::Random(x, nn),
            0xD => Self::Display(x, y, n),
            0xE => match nn {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unimplemented(ins.word()),
            },
            0xF => match nn {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unimplemented(ins.word()),
            },
            _ => Self::Unimplemented(ins.word()),
        }
    }
}
