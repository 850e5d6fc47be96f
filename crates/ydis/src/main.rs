//! ydis - A Y86-64 disassembler
//!
//! Usage:
//!   ydis <input> <output>                Disassemble from the first non-zero byte
//!   ydis <input> <output> <offset>       Start at a byte offset (0x.., 0.., or decimal)
//!   ydis <input> - --format json         Write JSON lines to stdout

mod json;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use ydis_disasm::{ListingSink, ScanConfig, Scanner, TextListing};

use json::JsonListing;

#[derive(Parser)]
#[command(name = "ydis")]
#[command(about = "A Y86-64 disassembler", long_about = None)]
struct Cli {
    /// Path to the machine code file
    input: PathBuf,

    /// Path to write the listing to, or `-` for stdout
    output: PathBuf,

    /// Byte offset to start disassembling at
    #[arg(value_parser = parse_offset)]
    start_offset: Option<u64>,

    /// Listing format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Disassemble zero bytes as `halt` instead of skipping them as padding
    #[arg(long)]
    no_skip_padding: bool,

    /// Log decoding details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Assembler-ready text
    Text,
    /// One JSON object per line
    Json,
}

/// Parses an offset the way `strtol` does with base 0: `0x` hex, a leading
/// `0` octal, decimal otherwise.
fn parse_offset(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let digits = s.strip_prefix('+').unwrap_or(s);
    let (digits, radix) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (&digits[1..], 8)
    } else {
        (digits, 10)
    };
    u64::from_str_radix(digits, radix).map_err(|e| format!("invalid offset {s:?}: {e}"))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn is_stdout(path: &std::path::Path) -> bool {
    path.as_os_str() == "-"
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = File::open(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    let mut input = BufReader::new(input);

    let writer: Box<dyn Write> = if is_stdout(&cli.output) {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(&cli.output)
            .with_context(|| format!("Failed to open {}", cli.output.display()))?;
        Box::new(file)
    };
    let mut out = BufWriter::new(writer);

    let config = ScanConfig {
        start_offset: cli.start_offset.unwrap_or(0),
        skip_padding: !cli.no_skip_padding,
    };

    let banner = format!(
        "Opened {}, starting offset 0x{:X}\nSaving output to {}",
        cli.input.display(),
        config.start_offset,
        cli.output.display()
    );
    if is_stdout(&cli.output) {
        eprintln!("{banner}");
    } else {
        println!("{banner}");
    }

    let summary = {
        let mut sink: Box<dyn ListingSink + '_> = match cli.format {
            Format::Text => Box::new(TextListing::new(&mut out)),
            Format::Json => Box::new(JsonListing::new(&mut out)),
        };
        Scanner::new(config)
            .run(&mut input, &mut *sink)
            .context("Failed to disassemble input")?
    };
    out.flush()
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    info!(
        "{} instructions, {} invalid spans ({} bytes), {} padding bytes skipped",
        summary.instructions, summary.invalid_spans, summary.invalid_bytes, summary.padding_bytes
    );
    Ok(())
}
