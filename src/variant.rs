//! Quirk policy for the two supported instruction sets.
//!
//! Shared opcode handlers ask the variant which behaviour applies instead of
//! being overridden per machine.

use clap::ValueEnum;

use crate::display::{HIRES_HEIGHT, HIRES_WIDTH, LORES_HEIGHT, LORES_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// Original CHIP-8
    #[default]
    #[value(name = "chip8")]
    Base,
    /// SUPER-CHIP
    #[value(name = "superchip")]
    Extended,
}

impl Variant {
    /// 00CN/00FB-00FF, DXY0 as 16x16, FX30, FX75, FX85.
    pub fn has_extended_opcodes(self) -> bool {
        self == Variant::Extended
    }

    /// 8XY6/8XYE copy VY into VX before shifting.
    pub fn shift_reads_vy(self) -> bool {
        self == Variant::Base
    }

    /// 8XY1/8XY2/8XY3 clear VF.
    pub fn logic_resets_flag(self) -> bool {
        self == Variant::Base
    }

    /// Register added to the target of BNNN.
    pub fn jump_offset_register(self, x: u8) -> u8 {
        match self {
            Variant::Base => 0,
            Variant::Extended => x,
        }
    }

    /// FX55/FX65 leave I pointing past the transferred block.
    pub fn transfer_advances_index(self) -> bool {
        self == Variant::Base
    }

    pub fn lores(self) -> (usize, usize) {
        (LORES_WIDTH, LORES_HEIGHT)
    }

    pub fn hires(self) -> (usize, usize) {
        match self {
            Variant::Base => (LORES_WIDTH, LORES_HEIGHT),
            Variant::Extended => (HIRES_WIDTH, HIRES_HEIGHT),
        }
    }
}
