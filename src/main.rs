// Separately:
// CPU: --speed times per second
// Display: 60 times per second
// Timer: 60 times per second

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};

use chip8vm::{window, Emulator, Flow, OpCodes};
use cli::Cli;

mod cli;

fn cycle(emu: &mut Emulator, trace: bool) -> anyhow::Result<Flow> {
    if !trace {
        return Ok(emu.step()?);
    }
    let addr = emu.mem.pc.0;
    let ins = emu.fetch();
    // the variant's own reading, so quirky forms trace as they execute
    let op = OpCodes::from_instruction(&ins, emu.variant());
    info!(target: "disasm", "{:03x}: {:04x} {}", addr, ins.word(), op);
    Ok(emu.execute_ins(op)?)
}

// runs one timer period worth of instructions, false once the program exits
fn frame(emu: &mut Emulator, cli: &Cli) -> anyhow::Result<bool> {
    for _ in 0..cli.cycles_per_tick() {
        if cycle(emu, cli.disasm)? == Flow::Exit {
            info!("program requested exit");
            return Ok(false);
        }
    }
    emu.tick_timers();
    Ok(true)
}

fn run_headless(emu: &mut Emulator, cli: &Cli, cycles: u64) -> anyhow::Result<()> {
    let per_tick = cli.cycles_per_tick() as u64;
    for n in 0..cycles {
        if cycle(emu, cli.disasm)? == Flow::Exit {
            info!("program requested exit");
            break;
        }
        if (n + 1) % per_tick == 0 {
            emu.tick_timers();
        }
    }
    print!("{}", emu.fb);
    Ok(())
}

fn run_windowed(emu: &mut Emulator, cli: &Cli) -> anyhow::Result<()> {
    let mut screen = window::Screen::new(window::scale_from_factor(cli.scale))
        .context("unable to open window")?;
    while screen.is_open() {
        screen.poll_keys(&mut emu.keypad);
        if !frame(emu, cli)? {
            break;
        }
        screen.present(&emu.fb)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .filter_module("disasm", if cli.disasm { LevelFilter::Info } else { level })
        .parse_default_env()
        .init();

    let mut emu = Emulator::from_file(cli.chip, &cli.rom, cli.seed)
        .with_context(|| format!("failed to load {}", cli.rom.display()))?;
    info!("loaded {} as {:?}", cli.rom.display(), emu.variant());

    match cli.headless {
        Some(cycles) => run_headless(&mut emu, &cli, cycles),
        None => run_windowed(&mut emu, &cli),
    }
}
