// 16 8-bit data registers named V0 to VF
// I -> address register
//
// 16 level stack of return addresses
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Tone on while the sound timer is non-zero
//
// Display res: 64 width, 32 height (128x64 in SUPER-CHIP high resolution)
//
// opcodes are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod decode;
pub mod disasm;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;
pub mod variant;
pub mod window;

pub use decode::{Instruction, OpCodes};
pub use disasm::disassemble;
pub use display::FrameBuffer;
pub use emulator::{Emulator, Flow};
pub use error::{LoadError, MachineError};
pub use variant::Variant;
