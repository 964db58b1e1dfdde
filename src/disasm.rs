//! Mnemonic rendering for diagnostics. No side effects.

use std::fmt;

use crate::{
    decode::{Instruction, OpCodes},
    variant::Variant,
};

/// Mnemonic for any instruction word, read as the extended machine would
/// (so BXNN shows VX as its offset register). Words with no meaning on either
/// machine render as an empty string. Use the `Display` of an `OpCodes`
/// decoded for a specific variant to see that machine's reading.
pub fn disassemble(ins: &Instruction) -> String {
    OpCodes::from_instruction(ins, Variant::Extended).to_string()
}

impl fmt::Display for OpCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OpCodes::ClearScreen => write!(f, "CLS"),
            OpCodes::PopSubroutine => write!(f, "RET"),
            OpCodes::MachineCall(addr) => write!(f, "SYS {addr:#05X}"),
            OpCodes::Jump(addr) => write!(f, "JP {addr:#05X}"),
            OpCodes::PushSubroutine(addr) => write!(f, "CALL {addr:#05X}"),
            OpCodes::SkipEqualConstant(x, nn) => write!(f, "SE V{x:X}, {nn:#04X}"),
            OpCodes::SkipNotEqualConstant(x, nn) => write!(f, "SNE V{x:X}, {nn:#04X}"),
            OpCodes::SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            OpCodes::SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            OpCodes::SetRegister(x, nn) => write!(f, "LD V{x:X}, {nn:#04X}"),
            OpCodes::AddToRegister(x, nn) => write!(f, "ADD V{x:X}, {nn:#04X}"),
            OpCodes::CopyRegister(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            OpCodes::Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            OpCodes::And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            OpCodes::XOr(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            OpCodes::Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            OpCodes::SubtractForward(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            OpCodes::SubtractBackward(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            OpCodes::RightShift(x, y) => write!(f, "SHR V{x:X}, V{y:X}"),
            OpCodes::LeftShift(x, y) => write!(f, "SHL V{x:X}, V{y:X}"),
            OpCodes::SetIndexRegister(addr) => write!(f, "LD I, {addr:#05X}"),
            OpCodes::JumpWithOffset(reg, addr) => write!(f, "JP V{reg:X}, {addr:#05X}"),
            OpCodes::Random(x, nn) => write!(f, "RND V{x:X}, {nn:#04X}"),
            OpCodes::Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            OpCodes::SkipIfPressed(x) => write!(f, "SKP V{x:X}"),
            OpCodes::SkipIfNotPressed(x) => write!(f, "SKNP V{x:X}"),
            OpCodes::CopyDelayToRegister(x) => write!(f, "LD V{x:X}, DT"),
            OpCodes::GetKey(x) => write!(f, "LD V{x:X}, K"),
            OpCodes::CopyRegisterToDelay(x) => write!(f, "LD DT, V{x:X}"),
            OpCodes::CopyRegisterToSound(x) => write!(f, "LD ST, V{x:X}"),
            OpCodes::AddToIndex(x) => write!(f, "ADD I, V{x:X}"),
            OpCodes::PointChar(x) => write!(f, "LD F, V{x:X}"),
            OpCodes::ToDecimal(x) => write!(f, "LD B, V{x:X}"),
            OpCodes::StoreRegisterToMemory(x) => write!(f, "LD [I], V{x:X}"),
            OpCodes::LoadRegisterFromMemory(x) => write!(f, "LD V{x:X}, [I]"),
            OpCodes::ScrollDown(n) => write!(f, "SCD {n}"),
            OpCodes::ScrollRight => write!(f, "SCR"),
            OpCodes::ScrollLeft => write!(f, "SCL"),
            OpCodes::Exit => write!(f, "EXIT"),
            OpCodes::LowRes => write!(f, "LOW"),
            OpCodes::HighRes => write!(f, "HIGH"),
            OpCodes::DisplayWide(x, y) => write!(f, "DRW V{x:X}, V{y:X}, 0"),
            OpCodes::PointBigChar(x) => write!(f, "LD HF, V{x:X}"),
            OpCodes::StoreFlags(x) => write!(f, "LD R, V{x:X}"),
            OpCodes::LoadFlags(x) => write!(f, "LD V{x:X}, R"),
            OpCodes::Unimplemented(_) => Ok(()),
        }
    }
}
