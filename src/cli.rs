use clap::Parser;
use std::path::PathBuf;

use chip8vm::Variant;

#[derive(Parser, Debug)]
#[command(
    name = "chip8vm",
    about = "CHIP-8 / SUPER-CHIP interpreter",
    version
)]
pub struct Cli {
    /// Program image to load at 0x200
    pub rom: PathBuf,

    /// Instruction set to emulate
    #[arg(short, long, value_enum, default_value_t = Variant::Base)]
    pub chip: Variant,

    /// Window scale factor
    #[arg(long, default_value_t = 8)]
    pub scale: u8,

    /// Instructions executed per second
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub speed: u32,

    /// Seed for the random number source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log the mnemonic of every executed instruction
    #[arg(long)]
    pub disasm: bool,

    /// Run N instructions without a window, then print the screen
    #[arg(long, value_name = "CYCLES")]
    pub headless: Option<u64>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Instructions between two 60 Hz timer ticks, at least one.
    pub fn cycles_per_tick(&self) -> u32 {
        (self.speed / chip8vm::timer::TIMER_HZ).max(1)
    }
}
