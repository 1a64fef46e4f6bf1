use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Linear sweep disassembler for 32 bit x86 flat binaries.
#[derive(Parser)]
struct Args {
    /// Path of the binary file to disassemble.
    #[arg(short = 'i', value_name = "FILE")]
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let code = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let insns = lsdis::disassemble(&code);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    lsdis::listing::write(&mut out, &insns)?;
    out.flush()?;
    Ok(())
}
