//! Write Wiswesser Line Notation from a SMILES string.

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use wlncrab::{dot, smiles, write_wln_with_graph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Smi,
    Inchi,
    Can,
}

/// Wiswesser line notation writer.
///
/// Reads a molecule and prints the minimal WLN string on stdout.
#[derive(Parser, Debug)]
#[command(name = "writewln", version, about)]
struct Cli {
    /// Input format
    #[arg(short = 'i', long = "input-format", value_enum)]
    format: Format,

    /// Input string (escaped)
    #[arg(short = 's', long = "string")]
    input: String,

    /// Print debug messages to stderr
    #[arg(short = 'd', long)]
    debug: bool,

    /// Dump molecule and WLN graphs to dot files in the working directory
    #[arg(short = 'w', long = "wln2dot")]
    wln2dot: bool,
}

fn main() {
    let cli = Cli::parse();

    let default = if cli.debug { "wlncrab=debug" } else { "wlncrab=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(message) = run(&cli) {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if cli.format != Format::Smi {
        return Err("only -i smi is supported in this build".into());
    }

    let mol = smiles::parse(&cli.input).map_err(|e| e.to_string())?;
    let (wln, graph) = write_wln_with_graph(&mol).map_err(|e| e.to_string())?;

    if cli.wln2dot {
        std::fs::write("mol-graph.dot", dot::molecule_dot(&mol))
            .map_err(|e| format!("could not write mol-graph.dot: {}", e))?;
        std::fs::write("wln-graph.dot", dot::wln_graph_dot(&graph))
            .map_err(|e| format!("could not write wln-graph.dot: {}", e))?;
    }

    println!("{}", wln);
    Ok(())
}
