use anyhow::{anyhow, Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use y86_disasm::*;

const USAGE: &str = "Usage: y86dis <entrée> [sortie] [--offset N] [--config FICHIER]";

/// Arguments de la ligne de commande
struct Args {
    input: String,
    output: Option<String>,
    offset: Option<u64>,
    config: Option<String>,
}

fn parse_offset(text: &str) -> Result<u64> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("Décalage invalide: {}", text))
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut offset = None;
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--offset" | "-o" => {
                let value = args.next().ok_or_else(|| anyhow!("--offset attend une valeur"))?;
                offset = Some(parse_offset(&value)?);
            }
            "--config" | "-c" => {
                config = Some(args.next().ok_or_else(|| anyhow!("--config attend un fichier"))?);
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let input = positional.next().ok_or_else(|| anyhow!(USAGE))?;
    let output = positional.next();
    if positional.next().is_some() {
        return Err(anyhow!(USAGE));
    }

    Ok(Args {
        input,
        output,
        offset,
        config,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;

    let mut config = match &args.config {
        Some(path) => DisassemblerConfig::load_from_file(path)
            .with_context(|| format!("Lecture de la configuration {}", path))?,
        None => DisassemblerConfig::default(),
    };
    if let Some(offset) = args.offset {
        config.input.start_offset = offset;
    }

    let source = File::open(&args.input)
        .with_context(|| format!("Ouverture de {}", args.input))?;
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Création de {}", path))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    info!(
        "y86dis v{}: {} à partir de l'octet {:#x}",
        VERSION, args.input, config.input.start_offset
    );

    let mut disassembler = Disassembler::with_config(config)?;
    let stats = disassembler.run(BufReader::new(source), BufWriter::new(sink))?;

    info!(
        "{} ligne(s) émise(s) pour {} octet(s)",
        stats.lines(),
        stats.bytes_consumed
    );

    Ok(())
}
